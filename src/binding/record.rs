//! Record binding.
//!
//! # Responsibilities
//! - Describe a record's fields statically (`FieldSpec`)
//! - Bind each declared field with the scalar rules
//! - Hand the bound values to the record constructor
//!
//! # Design Decisions
//! - Schema-driven, no reflection: a record lists its fields once
//! - Unknown request fields are ignored
//! - Fields bind in declaration order; the first error aborts the record

use crate::binding::error::{BindError, BindResult, RegistrationError};
use crate::binding::fields::FieldSet;
use crate::binding::scalar::{FromParam, ScalarParam};

/// Declared type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Int32,
    Int64,
    Bool,
}

/// Static description of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<&'static str>,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: true, default: None }
    }

    /// Absent binds [`BoundValue::Absent`]; read it back as an `Option`.
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: false, default: None }
    }

    pub const fn with_default(name: &'static str, kind: FieldKind, default: &'static str) -> Self {
        Self { name, kind, required: false, default: Some(default) }
    }
}

/// A value produced by binding one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundValue {
    Text(String),
    Int32(i32),
    Int64(i64),
    Bool(bool),
    Absent,
}

/// Conversion from a bound value back into a typed record field.
pub trait FromBound: Sized {
    fn from_bound(value: BoundValue) -> Option<Self>;
}

impl FromBound for String {
    fn from_bound(value: BoundValue) -> Option<Self> {
        match value {
            BoundValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl FromBound for i32 {
    fn from_bound(value: BoundValue) -> Option<Self> {
        match value {
            BoundValue::Int32(v) => Some(v),
            _ => None,
        }
    }
}

impl FromBound for i64 {
    fn from_bound(value: BoundValue) -> Option<Self> {
        match value {
            BoundValue::Int64(v) => Some(v),
            BoundValue::Int32(v) => Some(v.into()),
            _ => None,
        }
    }
}

impl FromBound for bool {
    fn from_bound(value: BoundValue) -> Option<Self> {
        match value {
            BoundValue::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: FromBound> FromBound for Option<T> {
    fn from_bound(value: BoundValue) -> Option<Self> {
        match value {
            BoundValue::Absent => Some(None),
            v => T::from_bound(v).map(Some),
        }
    }
}

/// Bound values of a record, keyed by field name.
#[derive(Debug, Default)]
pub struct BoundRecord {
    values: Vec<(&'static str, BoundValue)>,
}

impl BoundRecord {
    /// Take the value bound for `name`.
    ///
    /// A field that was never bound, or whose kind does not match `T`,
    /// reads as missing. [`validate_schema`] rejects such records before
    /// serving, so at request time this only reports absent client input.
    pub fn take<T: FromBound>(&mut self, name: &str) -> BindResult<T> {
        let value = self
            .values
            .iter_mut()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| std::mem::replace(v, BoundValue::Absent))
            .unwrap_or(BoundValue::Absent);
        T::from_bound(value).ok_or_else(|| BindError::missing(name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A structured value bound from request fields.
pub trait Record: Sized {
    /// Record name used in diagnostics.
    const NAME: &'static str;

    /// Declared fields, in binding order.
    fn schema() -> &'static [FieldSpec];

    /// Assemble the record from its bound fields.
    fn from_bound(values: BoundRecord) -> BindResult<Self>;
}

/// Bind every field `R` declares, then build `R`.
pub fn bind_record<R: Record>(fields: &FieldSet) -> BindResult<R> {
    let mut bound = BoundRecord::default();
    for spec in R::schema() {
        let value = bind_field(fields, spec)?;
        bound.values.push((spec.name, value));
    }
    R::from_bound(bound)
}

/// Check a record schema before serving.
///
/// Names must be unique and defaults must parse. The record is then
/// assembled twice from sample values, once with every field present and
/// once with optional fields absent, so a `take` that disagrees with the
/// declared kind fails here instead of on every request.
pub fn validate_schema<R: Record>() -> Result<(), RegistrationError> {
    let schema = R::schema();
    for (i, spec) in schema.iter().enumerate() {
        if schema[..i].iter().any(|other| other.name == spec.name) {
            return Err(RegistrationError::DuplicateField {
                record: R::NAME,
                name: spec.name,
            });
        }
        if let Some(default) = spec.default {
            match spec.kind {
                FieldKind::Text => check_default::<String>(spec.name, default)?,
                FieldKind::Int32 => check_default::<i32>(spec.name, default)?,
                FieldKind::Int64 => check_default::<i64>(spec.name, default)?,
                FieldKind::Bool => check_default::<bool>(spec.name, default)?,
            }
        }
    }

    for absent_optionals in [false, true] {
        let sample = sample_record(schema, absent_optionals);
        if let Err(e) = R::from_bound(sample) {
            return Err(RegistrationError::FieldMismatch {
                record: R::NAME,
                name: e.parameter().to_string(),
            });
        }
    }
    Ok(())
}

fn sample_record(schema: &'static [FieldSpec], absent_optionals: bool) -> BoundRecord {
    let values = schema
        .iter()
        .map(|spec| {
            let value = if absent_optionals && !spec.required && spec.default.is_none() {
                BoundValue::Absent
            } else {
                match spec.kind {
                    FieldKind::Text => BoundValue::Text(String::new()),
                    FieldKind::Int32 => BoundValue::Int32(0),
                    FieldKind::Int64 => BoundValue::Int64(0),
                    FieldKind::Bool => BoundValue::Bool(false),
                }
            };
            (spec.name, value)
        })
        .collect();
    BoundRecord { values }
}

fn check_default<T: FromParam>(name: &str, default: &str) -> Result<(), RegistrationError> {
    ScalarParam::<T>::with_default(name, default).map(|_| ())
}

fn bind_field(fields: &FieldSet, spec: &FieldSpec) -> BindResult<BoundValue> {
    match spec.kind {
        FieldKind::Text => bind_as::<String>(fields, spec, BoundValue::Text),
        FieldKind::Int32 => bind_as::<i32>(fields, spec, BoundValue::Int32),
        FieldKind::Int64 => bind_as::<i64>(fields, spec, BoundValue::Int64),
        FieldKind::Bool => bind_as::<bool>(fields, spec, BoundValue::Bool),
    }
}

fn bind_as<T: FromParam>(
    fields: &FieldSet,
    spec: &FieldSpec,
    wrap: fn(T) -> BoundValue,
) -> BindResult<BoundValue> {
    if !spec.required && spec.default.is_none() {
        let value = ScalarParam::<Option<T>>::optional(spec.name).bind(fields)?;
        return Ok(value.map(wrap).unwrap_or(BoundValue::Absent));
    }
    let rule = ScalarParam::<T>::from_parts(spec.name, spec.required, spec.default.map(str::to_string));
    rule.bind(fields).map(wrap)
}
