pub mod domain;
pub mod errors;
pub mod lyrics;
pub mod pagination;
pub mod ports;
pub mod services;

pub use errors::{CoreError, ErrorKind};
