//! Parameter binding endpoints.
//!
//! Every handler binds its inputs, logs them and answers `ok`. Binding
//! failures are logged, counted and returned as `400 Bad Request`.

use axum::extract::State;

use crate::binding::{
    bind_map, bind_record, bind_scalar, validate_schema, BindError, BindResult, FieldSet,
    RegistrationError, ScalarParam,
};
use crate::http::request::RequestFields;
use crate::http::response::OK_BODY;
use crate::http::server::AppState;
use crate::model::HelloData;
use crate::observability::metrics;

/// Binding rules shared by all requests, built once at startup.
#[derive(Debug, Clone)]
pub struct ParamRules {
    member_name: ScalarParam<String>,
    member_age: ScalarParam<i32>,
    required_username: ScalarParam<String>,
    optional_age: ScalarParam<Option<i32>>,
    default_username: ScalarParam<String>,
    default_age: ScalarParam<i32>,
}

impl ParamRules {
    /// Build and check every rule. Fails on an invalid default or record schema.
    pub fn new() -> Result<Self, RegistrationError> {
        validate_schema::<HelloData>()?;
        Ok(Self {
            member_name: ScalarParam::required("username"),
            member_age: ScalarParam::required("age"),
            required_username: ScalarParam::required("username"),
            optional_age: ScalarParam::optional("age"),
            default_username: ScalarParam::with_default("username", "guest")?,
            default_age: ScalarParam::with_default("age", "-1")?,
        })
    }
}

fn finish<T>(endpoint: &'static str, result: BindResult<T>) -> BindResult<&'static str> {
    metrics::record_binding(endpoint, &result);
    match result {
        Ok(_) => Ok(OK_BODY),
        Err(e) => {
            tracing::warn!(endpoint, parameter = e.parameter(), error = %e, "Parameter binding failed");
            Err(e)
        }
    }
}

/// Raw field access, parsing by hand.
pub async fn request_param_v1(RequestFields(fields): RequestFields) -> BindResult<&'static str> {
    let result = read_raw(&fields).map(|(username, age)| {
        tracing::info!(username = ?username, age, "request-param-v1");
    });
    finish("request-param-v1", result)
}

fn read_raw(fields: &FieldSet) -> BindResult<(Option<String>, i32)> {
    let username = fields.first("username").map(str::to_string);
    let raw_age = fields.first("age").ok_or_else(|| BindError::missing("age"))?;
    let age = raw_age
        .parse::<i32>()
        .map_err(|_| BindError::invalid("age", raw_age, "integer"))?;
    Ok((username, age))
}

/// Explicit rules bound into handler-local names.
pub async fn request_param_v2(
    State(state): State<AppState>,
    RequestFields(fields): RequestFields,
) -> BindResult<&'static str> {
    let rules = &state.rules;
    let result = bind_scalar(&fields, &rules.member_name).and_then(|member_name| {
        let member_age = bind_scalar(&fields, &rules.member_age)?;
        tracing::info!(username = %member_name, age = member_age, "request-param-v2");
        Ok(())
    });
    finish("request-param-v2", result)
}

/// Shorthand: the parameter name is the binding name.
pub async fn request_param_v3(RequestFields(fields): RequestFields) -> BindResult<&'static str> {
    let result = fields.required::<String>("username").and_then(|username| {
        let age = fields.required::<i32>("age")?;
        tracing::info!(username = %username, age, "request-param-v3");
        Ok(())
    });
    finish("request-param-v3", result)
}

/// Implicit binding: nothing is required, absence reads as `None`.
pub async fn request_param_v4(RequestFields(fields): RequestFields) -> BindResult<&'static str> {
    let result = fields.optional::<String>("username").and_then(|username| {
        let age = fields.optional::<i32>("age")?;
        tracing::info!(username = ?username, age = ?age, "request-param-v4");
        Ok(())
    });
    finish("request-param-v4", result)
}

/// `username` is required (an empty value still counts), `age` may be absent.
pub async fn request_param_required(
    State(state): State<AppState>,
    RequestFields(fields): RequestFields,
) -> BindResult<&'static str> {
    let rules = &state.rules;
    let result = rules.required_username.bind(&fields).and_then(|username| {
        let age = rules.optional_age.bind(&fields)?;
        tracing::info!(username = %username, age = ?age, "request-param-required");
        Ok(())
    });
    finish("request-param-required", result)
}

/// Absent or blank values fall back to `guest` and `-1`.
pub async fn request_param_default(
    State(state): State<AppState>,
    RequestFields(fields): RequestFields,
) -> BindResult<&'static str> {
    let rules = &state.rules;
    let result = rules.default_username.bind(&fields).and_then(|username| {
        let age = rules.default_age.bind(&fields)?;
        tracing::info!(username = %username, age, "request-param-default");
        Ok(())
    });
    finish("request-param-default", result)
}

/// Every parameter, first value per name.
pub async fn request_param_map(RequestFields(fields): RequestFields) -> BindResult<&'static str> {
    let params = bind_map(&fields);
    tracing::info!(
        username = ?params.get("username"),
        age = ?params.get("age"),
        params = %params,
        "request-param-map"
    );
    finish("request-param-map", Ok::<_, BindError>(params))
}

pub async fn model_attribute_v1(RequestFields(fields): RequestFields) -> BindResult<&'static str> {
    finish("model-attribute-v1", bind_hello(&fields, "model-attribute-v1"))
}

/// Same binding as v1; only the route differs.
pub async fn model_attribute_v2(RequestFields(fields): RequestFields) -> BindResult<&'static str> {
    finish("model-attribute-v2", bind_hello(&fields, "model-attribute-v2"))
}

fn bind_hello(fields: &FieldSet, endpoint: &'static str) -> BindResult<HelloData> {
    let hello_data: HelloData = bind_record(fields)?;
    tracing::info!(username = %hello_data.username, age = hello_data.age, "{}", endpoint);
    tracing::info!(hello_data = %hello_data, "{}", endpoint);
    Ok(hello_data)
}

pub async fn health() -> &'static str {
    OK_BODY
}
