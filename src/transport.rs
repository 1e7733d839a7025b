//! Transport of native requests to the search engine.
//!
//! The querier treats the transport as an opaque, blocking call: it either
//! returns a parsed [`NativeResponse`] or fails with
//! [`QuerierError::Transport`](crate::error::QuerierError::Transport).

pub mod memory;

#[cfg(feature = "http")]
pub mod http;

use crate::error::Result;
use crate::query::request::NativeRequest;
use crate::response::NativeResponse;

/// Executes native requests.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &NativeRequest) -> Result<NativeResponse>;
}

// Re-export commonly used types
pub use memory::RecordingTransport;

#[cfg(feature = "http")]
pub use http::HttpTransport;
