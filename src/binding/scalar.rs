//! Scalar binding.
//!
//! # Responsibilities
//! - Convert one raw request value into a typed handler input
//! - Apply required / optional / default-value rules
//!
//! # Design Decisions
//! - Absent-without-default is only representable through `Option<T>`:
//!   `ScalarParam::optional` exists for `Option<T>` targets only
//! - Defaults are parsed when the rule is built, so a bad default fails at
//!   registration, not on a request
//! - An empty string is a present value; it falls back to the default when
//!   the rule has one

use std::fmt;
use std::marker::PhantomData;

use crate::binding::error::{BindError, BindResult, RegistrationError};
use crate::binding::fields::FieldSet;

/// Types that can be parsed from a single raw parameter value.
pub trait FromParam: Sized {
    /// Human readable type name used in error messages.
    const EXPECTED: &'static str;

    /// Parse a present value.
    fn from_param(name: &str, raw: &str) -> BindResult<Self>;

    /// Value used when the parameter is absent and the rule allows it.
    ///
    /// Only nullable targets have one.
    fn absent() -> Option<Self> {
        None
    }

    /// Whether a blank value should read as "no value" for a nullable target.
    #[doc(hidden)]
    fn blank_is_null() -> bool {
        true
    }
}

impl FromParam for String {
    const EXPECTED: &'static str = "string";

    fn from_param(_name: &str, raw: &str) -> BindResult<Self> {
        Ok(raw.to_string())
    }

    fn blank_is_null() -> bool {
        false
    }
}

macro_rules! impl_from_param_for_int {
    ($($ty:ty => $expected:literal),* $(,)?) => {
        $(
            impl FromParam for $ty {
                const EXPECTED: &'static str = $expected;

                fn from_param(name: &str, raw: &str) -> BindResult<Self> {
                    raw.trim()
                        .parse::<$ty>()
                        .map_err(|_| BindError::invalid(name, raw, Self::EXPECTED))
                }
            }
        )*
    };
}

impl_from_param_for_int! {
    i32 => "integer",
    i64 => "long integer",
    u32 => "unsigned integer",
    u64 => "unsigned long integer",
}

impl FromParam for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_param(name: &str, raw: &str) -> BindResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Ok(true),
            "false" | "off" | "no" | "0" => Ok(false),
            _ => Err(BindError::invalid(name, raw, Self::EXPECTED)),
        }
    }
}

impl<T: FromParam> FromParam for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_param(name: &str, raw: &str) -> BindResult<Self> {
        if T::blank_is_null() && raw.trim().is_empty() {
            return Ok(None);
        }
        T::from_param(name, raw).map(Some)
    }

    fn absent() -> Option<Self> {
        Some(None)
    }
}

/// Binding rule for one named scalar parameter.
pub struct ScalarParam<T> {
    name: String,
    required: bool,
    default: Option<String>,
    _target: PhantomData<fn() -> T>,
}

impl<T: FromParam> ScalarParam<T> {
    /// A parameter that must be present.
    pub fn required(name: impl Into<String>) -> Self {
        Self::from_parts(name, true, None)
    }

    /// A parameter that falls back to `default` when absent or blank.
    ///
    /// Supplying a default makes the parameter optional. The default is
    /// parsed here so an invalid one is rejected before serving.
    pub fn with_default(
        name: impl Into<String>,
        default: impl Into<String>,
    ) -> Result<Self, RegistrationError> {
        let name = name.into();
        let default = default.into();
        if T::from_param(&name, &default).is_err() {
            return Err(RegistrationError::InvalidDefault {
                name,
                default,
                expected: T::EXPECTED,
            });
        }
        Ok(Self::from_parts(name, false, Some(default)))
    }

    pub(crate) fn from_parts(
        name: impl Into<String>,
        required: bool,
        default: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            required,
            default,
            _target: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Bind this parameter from the request fields.
    pub fn bind(&self, fields: &FieldSet) -> BindResult<T> {
        match (fields.first(&self.name), self.default.as_deref()) {
            (Some(raw), Some(default)) if raw.is_empty() => T::from_param(&self.name, default),
            (Some(raw), _) => T::from_param(&self.name, raw),
            (None, Some(default)) => T::from_param(&self.name, default),
            (None, None) if self.required => Err(BindError::missing(&self.name)),
            (None, None) => T::absent().ok_or_else(|| BindError::missing(&self.name)),
        }
    }
}

impl<T: FromParam> ScalarParam<Option<T>> {
    /// A parameter that may be absent; absence binds `None`.
    pub fn optional(name: impl Into<String>) -> Self {
        Self::from_parts(name, false, None)
    }
}

impl<T> Clone for ScalarParam<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            required: self.required,
            default: self.default.clone(),
            _target: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ScalarParam<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarParam")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

/// Bind a single scalar from `fields` according to `rule`.
pub fn bind_scalar<T: FromParam>(fields: &FieldSet, rule: &ScalarParam<T>) -> BindResult<T> {
    rule.bind(fields)
}
