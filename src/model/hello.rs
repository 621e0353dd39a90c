//! The `username` / `age` record used by the model-attribute endpoints.

use std::fmt;

use crate::binding::{BindResult, BoundRecord, FieldKind, FieldSpec, Record};

/// A user name and age pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelloData {
    pub username: String,
    pub age: i32,
}

impl Record for HelloData {
    const NAME: &'static str = "HelloData";

    fn schema() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::required("username", FieldKind::Text),
            FieldSpec::required("age", FieldKind::Int32),
        ];
        FIELDS
    }

    fn from_bound(mut values: BoundRecord) -> BindResult<Self> {
        Ok(Self {
            username: values.take("username")?,
            age: values.take("age")?,
        })
    }
}

impl fmt::Display for HelloData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HelloData(username={}, age={})", self.username, self.age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{bind_record, validate_schema, BindError, FieldSet};

    #[test]
    fn test_bind_hello_data() {
        let fields = FieldSet::from_urlencoded(b"username=hello&age=20");
        let data: HelloData = bind_record(&fields).unwrap();
        assert_eq!(data, HelloData { username: "hello".into(), age: 20 });
        assert_eq!(data.to_string(), "HelloData(username=hello, age=20)");
    }

    #[test]
    fn test_round_trip_through_log_representation() {
        for (username, age) in [("a", 0), ("kim min su", -7), ("", 2147483647), ("x&y", -2147483648)] {
            let fields: FieldSet = [("username", username.to_string()), ("age", age.to_string())]
                .into_iter()
                .collect();
            let data: HelloData = bind_record(&fields).unwrap();
            assert_eq!(data.username, username);
            assert_eq!(data.age, age);
            assert_eq!(data.to_string(), format!("HelloData(username={}, age={})", username, age));
        }
    }

    #[test]
    fn test_non_numeric_age() {
        let fields = FieldSet::from_urlencoded(b"username=hello&age=abc");
        assert_eq!(
            bind_record::<HelloData>(&fields),
            Err(BindError::invalid("age", "abc", "integer"))
        );
    }

    #[test]
    fn test_schema_is_valid() {
        assert!(validate_schema::<HelloData>().is_ok());
    }
}
