//! Request parameter binding service library.

pub mod binding;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod observability;

pub use binding::{BindError, FieldSet, ScalarParam};
pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
