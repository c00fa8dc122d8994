pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod storage;
pub mod sync;

pub use error::{CacheError, Result};
