//! Query Sort Orders
//!
//! Sort orders define how query results should be ordered. Missing or null
//! values always sort last, whatever the direction.

use chrono::{DateTime, FixedOffset};
use serde_json::Value as JsonValue;
use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending order (A-Z, 1-9, oldest first)
    #[default]
    Asc,
    /// Descending order (Z-A, 9-1, newest first)
    Desc,
}

/// A single sort criterion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortCriterion {
    /// The attribute to sort by
    pub attribute: String,
    /// The sort direction
    pub direction: SortDirection,
}

impl SortCriterion {
    pub fn new(attribute: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            attribute: attribute.into(),
            direction,
        }
    }

    pub fn asc(attribute: impl Into<String>) -> Self {
        Self::new(attribute, SortDirection::Asc)
    }

    pub fn desc(attribute: impl Into<String>) -> Self {
        Self::new(attribute, SortDirection::Desc)
    }

    /// Compare two documents on this criterion
    pub fn compare(&self, a: &JsonValue, b: &JsonValue) -> Ordering {
        let left = a.get(&self.attribute).unwrap_or(&JsonValue::Null);
        let right = b.get(&self.attribute).unwrap_or(&JsonValue::Null);

        match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ordering = compare_values(left, right);
                match self.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            }
        }
    }
}

/// Order two non-null JSON scalars. Strings that both parse as RFC 3339
/// timestamps compare chronologically.
fn compare_values(a: &JsonValue, b: &JsonValue) -> Ordering {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (JsonValue::String(x), JsonValue::String(y)) => {
            match (parse_timestamp(x), parse_timestamp(y)) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (JsonValue::Bool(x), JsonValue::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    if s.len() <= 10 {
        return None;
    }
    DateTime::parse_from_rfc3339(s).ok()
}

/// Collection of sort criteria
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOrder {
    criteria: Vec<SortCriterion>,
}

impl SortOrder {
    pub fn new() -> Self {
        Self { criteria: vec![] }
    }

    /// Add a sort criterion (builder pattern)
    pub fn then(mut self, criterion: SortCriterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    /// Get all sort criteria
    pub fn criteria(&self) -> &[SortCriterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Compare two documents on every criterion in turn
    pub fn compare(&self, a: &JsonValue, b: &JsonValue) -> Ordering {
        self.criteria
            .iter()
            .map(|c| c.compare(a, b))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nulls_sort_last_both_directions() {
        let dated = json!({"dueDate": "2024-01-01"});
        let undated = json!({"dueDate": null});

        let asc = SortCriterion::asc("dueDate");
        let desc = SortCriterion::desc("dueDate");
        assert_eq!(asc.compare(&dated, &undated), Ordering::Less);
        assert_eq!(desc.compare(&dated, &undated), Ordering::Less);
        assert_eq!(desc.compare(&undated, &json!({})), Ordering::Equal);
    }

    #[test]
    fn test_timestamps_compare_chronologically() {
        let whole = json!({"createdAt": "2024-01-01T10:00:00Z"});
        let fraction = json!({"createdAt": "2024-01-01T10:00:00.500Z"});

        let order = SortOrder::new().then(SortCriterion::asc("createdAt"));
        assert_eq!(order.compare(&whole, &fraction), Ordering::Less);
    }

    #[test]
    fn test_secondary_criterion_breaks_ties() {
        let a = json!({"status": "todo", "order": 2});
        let b = json!({"status": "todo", "order": 1});

        let order = SortOrder::new()
            .then(SortCriterion::asc("status"))
            .then(SortCriterion::asc("order"));
        assert_eq!(order.compare(&a, &b), Ordering::Greater);
    }
}
