//! Query Filters
//!
//! A filter is a condition on one top-level attribute of a document, named
//! the way it appears in the stored JSON (camelCase).

use ph_core::traits::Id;
use serde_json::Value as JsonValue;

/// Filter operators that can be applied to values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Attribute equals the value
    Equals,
    /// Attribute equals one of the listed values
    In,
    /// Array attribute contains the value
    Contains,
}

/// Filter value types
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Single document id
    Id(Id),
    /// List of document ids
    Ids(Vec<Id>),
    /// Single string value
    String(String),
    /// Boolean value
    Bool(bool),
}

impl FilterValue {
    /// The value as JSON, as it would appear inside a document
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Id(id) => JsonValue::String(id.to_string()),
            Self::Ids(ids) => ids.iter().map(|id| JsonValue::String(id.to_string())).collect(),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Bool(b) => JsonValue::Bool(*b),
        }
    }

    /// Each listed value as JSON; scalars become a one-element list
    pub fn to_json_list(&self) -> Vec<JsonValue> {
        match self.to_json() {
            JsonValue::Array(items) => items,
            other => vec![other],
        }
    }
}

impl From<Id> for FilterValue {
    fn from(id: Id) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// A single filter condition
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// The attribute being filtered (e.g. `project`, `assignees`)
    pub attribute: String,
    /// The operator to apply
    pub operator: FilterOperator,
    /// The value to compare against
    pub value: FilterValue,
}

impl Filter {
    /// Create a new filter
    pub fn new(attribute: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            attribute: attribute.into(),
            operator,
            value,
        }
    }

    pub fn equals(attribute: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(attribute, FilterOperator::Equals, value.into())
    }

    /// Attribute is one of the given ids
    pub fn in_ids(attribute: impl Into<String>, ids: Vec<Id>) -> Self {
        Self::new(attribute, FilterOperator::In, FilterValue::Ids(ids))
    }

    /// Array attribute contains the value
    pub fn contains(attribute: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(attribute, FilterOperator::Contains, value.into())
    }

    /// Evaluate the filter against a JSON document
    pub fn matches(&self, doc: &JsonValue) -> bool {
        let field = doc.get(&self.attribute).unwrap_or(&JsonValue::Null);

        match self.operator {
            FilterOperator::Equals => *field == self.value.to_json(),
            FilterOperator::In => self.value.to_json_list().contains(field),
            FilterOperator::Contains => match field {
                JsonValue::Array(items) => {
                    let wanted = self.value.to_json_list();
                    !wanted.is_empty() && wanted.iter().all(|w| items.contains(w))
                }
                _ => false,
            },
        }
    }
}

/// Filter set: every filter in `all` must match, and when `any` is not
/// empty at least one of its filters must match as well.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    all: Vec<Filter>,
    any: Vec<Filter>,
}

impl FilterSet {
    /// Create a new empty filter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter to the set
    pub fn add(&mut self, filter: Filter) -> &mut Self {
        self.all.push(filter);
        self
    }

    /// Add a filter and return self (builder pattern)
    pub fn with(mut self, filter: Filter) -> Self {
        self.all.push(filter);
        self
    }

    /// Add alternatives of which at least one must match
    pub fn with_any(mut self, filters: Vec<Filter>) -> Self {
        self.any.extend(filters);
        self
    }

    /// Filters combined with AND
    pub fn filters(&self) -> &[Filter] {
        &self.all
    }

    /// Filters combined with OR
    pub fn alternatives(&self) -> &[Filter] {
        &self.any
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty() && self.any.is_empty()
    }

    /// Evaluate the whole set against a JSON document
    pub fn matches(&self, doc: &JsonValue) -> bool {
        self.all.iter().all(|f| f.matches(doc))
            && (self.any.is_empty() || self.any.iter().any(|f| f.matches(doc)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equals() {
        let project = ph_core::traits::new_id();
        let doc = json!({"project": project.to_string(), "status": "todo", "isRead": false});

        assert!(Filter::equals("project", project).matches(&doc));
        assert!(Filter::equals("isRead", false).matches(&doc));
        assert!(!Filter::equals("status", "done").matches(&doc));
        // missing attributes never equal a value
        assert!(!Filter::equals("milestone", project).matches(&doc));
    }

    #[test]
    fn test_in_and_contains() {
        let a = ph_core::traits::new_id();
        let b = ph_core::traits::new_id();
        let doc = json!({"assignees": [a.to_string()], "project": b.to_string()});

        assert!(Filter::contains("assignees", a).matches(&doc));
        assert!(!Filter::contains("assignees", b).matches(&doc));
        assert!(Filter::in_ids("project", vec![a, b]).matches(&doc));
        assert!(!Filter::in_ids("project", vec![a]).matches(&doc));
        assert!(!Filter::in_ids("project", vec![]).matches(&doc));
    }

    #[test]
    fn test_filter_set_any_group() {
        let me = ph_core::traits::new_id();
        let set = FilterSet::new()
            .with(Filter::equals("status", "active"))
            .with_any(vec![
                Filter::equals("manager", me),
                Filter::contains("members", me),
            ]);

        let managed = json!({"status": "active", "manager": me.to_string(), "members": []});
        let member = json!({"status": "active", "manager": "x", "members": [me.to_string()]});
        let other = json!({"status": "active", "manager": "x", "members": []});
        let inactive = json!({"status": "planning", "manager": me.to_string()});

        assert!(set.matches(&managed));
        assert!(set.matches(&member));
        assert!(!set.matches(&other));
        assert!(!set.matches(&inactive));
        assert_eq!(set.filters().len(), 1);
        assert_eq!(set.alternatives().len(), 2);
    }
}
