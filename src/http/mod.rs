//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, RequestFields extraction)
//!     → handlers.rs (bind, log, respond)
//!     → response.rs ("ok", or BindError → 400)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestFields, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
