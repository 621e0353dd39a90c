//! Records bound from request parameters.

pub mod hello;

pub use hello::HelloData;
