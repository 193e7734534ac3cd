//! Session endpoint adapters

mod http;

pub use http::HttpUploader;
