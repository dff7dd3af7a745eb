//! Routing module
//!
//! Turns the served directory tree into a fixed route table:
//! - Directory walk with per-segment exclusion
//! - Path to URL route derivation
//! - Endpoint registration

pub mod route;
pub mod table;
pub mod walker;

pub use route::derive_route;
pub use table::{build_route_table, RouteTable};
pub use walker::{FileEntry, Walker};
