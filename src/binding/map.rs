//! Map binding: every parameter name to its first value.

use std::fmt;

use crate::binding::fields::FieldSet;

/// Single-valued view of the request parameters, in arrival order.
///
/// Repeated names keep only their first value. Use [`FieldSet::all`] when
/// every value of a repeated name is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamMap {
    entries: Vec<(String, String)>,
}

impl ParamMap {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl fmt::Display for ParamMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        write!(f, "}}")
    }
}

/// Collapse the field set into a name -> first value map.
pub fn bind_map(fields: &FieldSet) -> ParamMap {
    let entries = fields
        .iter()
        .filter_map(|(name, values)| values.first().map(|v| (name.to_string(), v.clone())))
        .collect();
    ParamMap { entries }
}
