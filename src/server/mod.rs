//! Request, response and HTTP host types surrounding the router.
//!
//! [`Request`] and [`ResponseWriter`] are the only shapes the router and its
//! handlers see. [`HttpServer`] is one host that produces them from real
//! HTTP traffic; tests drive the router directly with [`BufferedResponse`].

pub mod http_server;
pub mod request;
pub mod response;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{split_target, Request};
pub use response::{BufferedResponse, ResponseWriter};
