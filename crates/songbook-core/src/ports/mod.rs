pub mod song_repository;

pub use song_repository::SongRepository;
