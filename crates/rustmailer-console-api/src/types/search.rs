//! Search expression tree understood by the message search endpoint.

use serde::{Deserialize, Serialize};

/// Boolean operator of a [`SearchExpr::Logic`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicOperator {
    /// All children must match.
    #[serde(rename = "AND")]
    And,
    /// Any child must match.
    #[serde(rename = "OR")]
    Or,
    /// The single child must not match.
    #[serde(rename = "Not")]
    Not,
}

impl LogicOperator {
    /// Get display name for the operator.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
        }
    }
}

/// A node of the search expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SearchExpr {
    /// Leaf comparison: `condition` is the field, `value` the operand.
    Condition {
        /// Field name (`flag`, `from`, `subject`, ...).
        condition: String,
        /// Value to compare against.
        value: String,
    },
    /// Boolean combination of child expressions.
    Logic {
        /// Operator.
        operator: LogicOperator,
        /// Operands.
        children: Vec<SearchExpr>,
    },
}

impl SearchExpr {
    /// Creates a condition node.
    #[must_use]
    pub fn condition(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Condition {
            condition: field.into(),
            value: value.into(),
        }
    }

    /// Wraps an expression in a negation node.
    #[must_use]
    pub fn not(expr: Self) -> Self {
        Self::Logic {
            operator: LogicOperator::Not,
            children: vec![expr],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_condition_wire_format() {
        let expr = SearchExpr::condition("flag", "Seen");
        assert_eq!(
            serde_json::to_value(&expr).unwrap(),
            json!({"type": "Condition", "condition": "flag", "value": "Seen"})
        );
    }

    #[test]
    fn test_logic_wire_format() {
        let expr = SearchExpr::Logic {
            operator: LogicOperator::And,
            children: vec![
                SearchExpr::condition("from", "a@x.com"),
                SearchExpr::not(SearchExpr::condition("flag", "Seen")),
            ],
        };
        assert_eq!(
            serde_json::to_value(&expr).unwrap(),
            json!({
                "type": "Logic",
                "operator": "AND",
                "children": [
                    {"type": "Condition", "condition": "from", "value": "a@x.com"},
                    {"type": "Logic", "operator": "Not", "children": [
                        {"type": "Condition", "condition": "flag", "value": "Seen"}
                    ]}
                ]
            })
        );
    }
}
