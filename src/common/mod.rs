//! Common utilities and types shared across bucketprops

pub mod config;
pub mod error;
pub mod utils;

pub use self::config::ClientConfig;
pub use error::{Error, Result};
pub use utils::{bucket_path, encode_bucket, media_type_essence};
