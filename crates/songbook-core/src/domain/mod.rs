pub mod filter;
pub mod ids;
pub mod page;
pub mod patch;
pub mod song;

pub use filter::SongFilter;
pub use ids::SongId;
pub use page::{LyricsPage, Page};
pub use patch::{FieldUpdate, SongPatch};
pub use song::{NewSong, Song, SongInput};
