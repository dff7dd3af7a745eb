//! sv - serve a directory tree over HTTP
//!
//! Every file below the root gets its own route, fixed at startup. Files are either
//! loaded into memory up front (eager) or opened per request (lazy).

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;
