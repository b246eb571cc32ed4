/// One page of a listing plus its position in the whole result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub current_page: u64,
  pub total_pages: u64,
  pub total_items: u64,
  pub page_size: u64,
}

impl<T> Page<T> {
  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      items: self.items.into_iter().map(f).collect(),
      current_page: self.current_page,
      total_pages: self.total_pages,
      total_items: self.total_items,
      page_size: self.page_size,
    }
  }
}

/// A contiguous run of verses from a song's lyrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsPage {
  pub text: String,
  pub current_page: u64,
  pub total_pages: u64,
  pub page_size: u64,
}
