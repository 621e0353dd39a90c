//! Request field set.
//!
//! # Responsibilities
//! - Collect `(name, values)` pairs from the query string and form body
//! - Preserve arrival order of names and of repeated values
//! - First-value lookup by default, all values on request
//!
//! # Design Decisions
//! - Names are indexed, so building a set is linear in the number of pairs

use std::collections::HashMap;

use url::form_urlencoded;

use crate::binding::error::BindResult;
use crate::binding::scalar::{FromParam, ScalarParam};

/// Ordered, multi-valued collection of request parameters.
///
/// A name appears once; repeated occurrences append to its value list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    entries: Vec<(String, Vec<String>)>,
    /// Name -> position in `entries`.
    index: HashMap<String, usize>,
}

impl FieldSet {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` string (query or body).
    pub fn from_urlencoded(input: &[u8]) -> Self {
        let mut fields = Self::new();
        fields.extend_urlencoded(input);
        fields
    }

    /// Append the pairs of an urlencoded string after the existing fields.
    pub fn extend_urlencoded(&mut self, input: &[u8]) {
        for (name, value) in form_urlencoded::parse(input) {
            self.push(name.into_owned(), value.into_owned());
        }
    }

    /// Add one value for `name`.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.index.get(&name) {
            Some(&i) => self.entries[i].1.push(value),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, vec![value]));
            }
        }
    }

    /// First value of `name`, if present. An empty string counts as present.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.all(name).and_then(|values| values.first()).map(String::as_str)
    }

    /// Every value of `name`, in arrival order.
    pub fn all(&self, name: &str) -> Option<&[String]> {
        self.index
            .get(name)
            .map(|&i| self.entries[i].1.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.all(name).is_some()
    }

    /// Iterate over `(name, values)` in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bind `name` as a required `T` with no default.
    pub fn required<T: FromParam>(&self, name: &str) -> BindResult<T> {
        ScalarParam::<T>::required(name).bind(self)
    }

    /// Bind `name` as an optional `T`; absence yields `None`.
    pub fn optional<T: FromParam>(&self, name: &str) -> BindResult<Option<T>> {
        ScalarParam::<Option<T>>::optional(name).bind(self)
    }
}

impl<K, V> FromIterator<(K, V)> for FieldSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (name, value) in iter {
            fields.push(name, value);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::BindError;

    #[test]
    fn test_parse_query_string() {
        let fields = FieldSet::from_urlencoded(b"username=hello&age=20");
        assert_eq!(fields.first("username"), Some("hello"));
        assert_eq!(fields.first("age"), Some("20"));
        assert_eq!(fields.first("missing"), None);
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_repeated_keys_keep_order() {
        let fields = FieldSet::from_urlencoded(b"username=id1&age=3&username=id2");
        assert_eq!(fields.first("username"), Some("id1"));
        assert_eq!(
            fields.all("username"),
            Some(&["id1".to_string(), "id2".to_string()][..])
        );
        let names: Vec<&str> = fields.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["username", "age"]);
    }

    #[test]
    fn test_empty_value_is_present() {
        let fields = FieldSet::from_urlencoded(b"username=&flag");
        assert!(fields.contains("username"));
        assert_eq!(fields.first("username"), Some(""));
        assert_eq!(fields.first("flag"), Some(""));
    }

    #[test]
    fn test_percent_and_plus_decoding() {
        let fields = FieldSet::from_urlencoded(b"username=kim+min%20su&city=%EC%84%9C%EC%9A%B8");
        assert_eq!(fields.first("username"), Some("kim min su"));
        assert_eq!(fields.first("city"), Some("서울"));
    }

    #[test]
    fn test_form_body_appends_after_query() {
        let mut fields = FieldSet::from_urlencoded(b"username=from-query");
        fields.extend_urlencoded(b"username=from-body&age=7");
        assert_eq!(fields.first("username"), Some("from-query"));
        assert_eq!(fields.all("username").map(|v| v.len()), Some(2));
        assert_eq!(fields.first("age"), Some("7"));
    }

    #[test]
    fn test_many_distinct_names_build_quickly() {
        let n = 200_000;
        let body: String = (0..n).map(|i| format!("k{i}=&")).collect();

        let start = std::time::Instant::now();
        let fields = FieldSet::from_urlencoded(body.as_bytes());
        let elapsed = start.elapsed();

        assert_eq!(fields.len(), n);
        assert_eq!(fields.first("k0"), Some(""));
        assert_eq!(fields.first("k199999"), Some(""));
        assert_eq!(fields.iter().nth(12345).map(|(name, _)| name), Some("k12345"));
        assert!(elapsed < std::time::Duration::from_secs(10), "took {elapsed:?}");
    }

    #[test]
    fn test_shorthand_binding() {
        let fields: FieldSet = [("username", "hello"), ("age", "20")].into_iter().collect();
        assert_eq!(fields.required::<String>("username").unwrap(), "hello");
        assert_eq!(fields.required::<i32>("age").unwrap(), 20);
        assert_eq!(fields.optional::<i32>("other").unwrap(), None);
        assert_eq!(
            fields.required::<i32>("other"),
            Err(BindError::missing("other"))
        );
    }
}
