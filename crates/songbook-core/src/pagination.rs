//! Page arithmetic shared by song listing and lyrics retrieval.

use crate::errors::CoreError;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Page number and size as requested by the caller. Values `<= 0` select the
/// defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
  pub page: i64,
  pub page_size: i64,
}

impl PageRequest {
  pub fn new(page: i64, page_size: i64) -> Self {
    PageRequest { page, page_size }
  }
}

/// Resolved position of a page inside a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
  pub page: u64,
  pub page_size: u64,
  pub offset: u64,
  pub total_pages: u64,
}

impl PageWindow {
  /// Exclusive end index of the page, clamped to `total_items`.
  pub fn end(&self, total_items: u64) -> u64 {
    (self.offset + self.page_size).min(total_items)
  }
}

/// Resolves `request` against a result set of `total_items` elements.
///
/// A page past the last one is an error, and so is page 1 of an empty set:
/// zero items means zero pages.
pub fn paginate(total_items: u64, request: PageRequest) -> Result<PageWindow, CoreError> {
  let page_size = u64::try_from(request.page_size).ok().filter(|&s| s > 0).unwrap_or(DEFAULT_PAGE_SIZE);
  let page = u64::try_from(request.page).ok().filter(|&p| p > 0).unwrap_or(DEFAULT_PAGE);

  let total_pages = total_items.div_ceil(page_size);
  if page > total_pages {
    return Err(CoreError::not_found(format!("page {page} does not exist, total pages: {total_pages}")));
  }

  Ok(PageWindow { page, page_size, offset: (page - 1) * page_size, total_pages })
}
