//! Request handler module
//!
//! Per-file endpoints and the request entry point that dispatches to them.

pub mod endpoint;
pub mod router;

// Re-export main entry point
pub use endpoint::Endpoint;
pub use router::handle_request;
