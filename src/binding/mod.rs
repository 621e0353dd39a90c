//! Parameter binding subsystem.
//!
//! # Data Flow
//! ```text
//! query string + urlencoded form body
//!     → fields.rs (FieldSet: ordered, multi-valued)
//!     → scalar.rs (ScalarParam<T>: required / optional / default)
//!     → map.rs    (ParamMap: first value per name)
//!     → record.rs (Record schema → one scalar bind per field)
//!     → typed handler inputs, or BindError
//! ```
//!
//! # Design Decisions
//! - Binding is pure and request-scoped; rules are immutable and shared
//! - Lookups return the first value of a repeated name
//! - An empty value is present, not missing
//! - Registration errors (bad defaults, duplicate fields) surface at startup

pub mod error;
pub mod fields;
pub mod map;
pub mod record;
pub mod scalar;

pub use error::{BindError, BindResult, RegistrationError};
pub use fields::FieldSet;
pub use map::{bind_map, ParamMap};
pub use record::{bind_record, validate_schema, BoundRecord, FieldKind, FieldSpec, Record};
pub use scalar::{bind_scalar, FromParam, ScalarParam};
