use std::fmt;
use std::str::FromStr;

/// Identifier of a stored song. Assigned by the store on insert and never
/// changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SongId(i32);

impl SongId {
  pub fn new(raw: i32) -> Self {
    SongId(raw)
  }

  pub fn get(&self) -> i32 {
    self.0
  }
}

impl From<i32> for SongId {
  fn from(raw: i32) -> Self {
    SongId(raw)
  }
}

impl From<SongId> for i32 {
  fn from(id: SongId) -> Self {
    id.0
  }
}

impl FromStr for SongId {
  type Err = std::num::ParseIntError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    s.trim().parse::<i32>().map(SongId)
  }
}

impl fmt::Display for SongId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}
