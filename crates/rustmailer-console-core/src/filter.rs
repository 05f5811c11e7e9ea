//! Translates the flat message filter form into a search expression tree.

use rustmailer_console_api::types::{LogicOperator, SearchExpr};

/// Field a filter condition applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterField {
    /// Message flag (`Seen`, `Flagged`, ...).
    #[default]
    Flag,
    /// Sender address.
    From,
    /// Recipient address.
    To,
    /// Carbon-copy address.
    Cc,
    /// Subject text.
    Subject,
    /// Body text.
    Body,
    /// Arrived on or after a date (`YYYY-MM-DD`).
    Since,
    /// Arrived before a date (`YYYY-MM-DD`).
    Before,
}

impl FilterField {
    /// Every field, in picker order.
    pub const ALL: [Self; 8] = [
        Self::Flag,
        Self::From,
        Self::To,
        Self::Cc,
        Self::Subject,
        Self::Body,
        Self::Since,
        Self::Before,
    ];

    /// Name used in the search expression.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::From => "from",
            Self::To => "to",
            Self::Cc => "cc",
            Self::Subject => "subject",
            Self::Body => "body",
            Self::Since => "since",
            Self::Before => "before",
        }
    }
}

impl std::fmt::Display for FilterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Comparison {
    /// Field matches the value.
    #[default]
    Is,
    /// Field does not match the value.
    IsNot,
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Is => "is",
            Self::IsNot => "is not",
        })
    }
}

/// Boolean operator joining several conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    /// Every condition must hold.
    And,
    /// At least one condition must hold.
    Or,
}

impl FilterOperator {
    const fn logic(self) -> LogicOperator {
        match self {
            Self::And => LogicOperator::And,
            Self::Or => LogicOperator::Or,
        }
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::And => "and",
            Self::Or => "or",
        })
    }
}

/// One row of the filter form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCondition {
    /// Field.
    pub field: FilterField,
    /// Comparison.
    pub comparison: Comparison,
    /// Value as typed.
    pub value: String,
}

impl FilterCondition {
    /// Creates a condition.
    #[must_use]
    pub fn new(field: FilterField, comparison: Comparison, value: impl Into<String>) -> Self {
        Self {
            field,
            comparison,
            value: value.into(),
        }
    }

    fn to_expr(&self) -> SearchExpr {
        let condition = SearchExpr::condition(self.field.as_str(), self.value.trim());
        match self.comparison {
            Comparison::Is => condition,
            Comparison::IsNot => SearchExpr::not(condition),
        }
    }
}

/// The filter form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterForm {
    /// Operator; `None` means a single condition.
    pub operator: Option<FilterOperator>,
    /// Conditions.
    pub conditions: Vec<FilterCondition>,
}

/// Why a filter form cannot be turned into an expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// Without an operator exactly one condition is allowed.
    #[error("Choose an operator to combine {0} conditions")]
    ExpectedSingleCondition(usize),
    /// No condition was given.
    #[error("Add at least one condition")]
    NoConditions,
    /// A condition has an empty value.
    #[error("Condition {} needs a value", .0 + 1)]
    EmptyValue(usize),
}

impl FilterForm {
    /// Builds the search expression.
    ///
    /// # Errors
    ///
    /// See [`FilterError`].
    pub fn build(&self) -> Result<SearchExpr, FilterError> {
        if let Some(index) = self
            .conditions
            .iter()
            .position(|c| c.value.trim().is_empty())
        {
            return Err(FilterError::EmptyValue(index));
        }

        match self.operator {
            None => match self.conditions.as_slice() {
                [single] => Ok(single.to_expr()),
                [] => Err(FilterError::NoConditions),
                other => Err(FilterError::ExpectedSingleCondition(other.len())),
            },
            Some(_) if self.conditions.is_empty() => Err(FilterError::NoConditions),
            Some(operator) => Ok(SearchExpr::Logic {
                operator: operator.logic(),
                children: self.conditions.iter().map(FilterCondition::to_expr).collect(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seen(comparison: Comparison) -> FilterCondition {
        FilterCondition::new(FilterField::Flag, comparison, "Seen")
    }

    #[test]
    fn test_single_condition() {
        let form = FilterForm {
            operator: None,
            conditions: vec![seen(Comparison::Is)],
        };
        assert_eq!(
            serde_json::to_value(form.build().unwrap()).unwrap(),
            json!({"type": "Condition", "condition": "flag", "value": "Seen"})
        );
    }

    #[test]
    fn test_is_not_wraps_in_negation() {
        let form = FilterForm {
            operator: None,
            conditions: vec![seen(Comparison::IsNot)],
        };
        assert_eq!(
            serde_json::to_value(form.build().unwrap()).unwrap(),
            json!({
                "type": "Logic",
                "operator": "Not",
                "children": [{"type": "Condition", "condition": "flag", "value": "Seen"}]
            })
        );
    }

    #[test]
    fn test_and_combines_children() {
        let form = FilterForm {
            operator: Some(FilterOperator::And),
            conditions: vec![
                seen(Comparison::IsNot),
                FilterCondition::new(FilterField::From, Comparison::Is, " boss@x.com "),
            ],
        };
        assert_eq!(
            serde_json::to_value(form.build().unwrap()).unwrap(),
            json!({
                "type": "Logic",
                "operator": "AND",
                "children": [
                    {"type": "Logic", "operator": "Not", "children": [
                        {"type": "Condition", "condition": "flag", "value": "Seen"}
                    ]},
                    {"type": "Condition", "condition": "from", "value": "boss@x.com"}
                ]
            })
        );
    }

    #[test]
    fn test_operator_required_for_many() {
        let form = FilterForm {
            operator: None,
            conditions: vec![seen(Comparison::Is), seen(Comparison::IsNot)],
        };
        assert_eq!(form.build(), Err(FilterError::ExpectedSingleCondition(2)));
        assert_eq!(FilterForm::default().build(), Err(FilterError::NoConditions));
    }

    #[test]
    fn test_operator_without_conditions() {
        let form = FilterForm {
            operator: Some(FilterOperator::Or),
            conditions: Vec::new(),
        };
        assert_eq!(form.build(), Err(FilterError::NoConditions));
    }

    #[test]
    fn test_empty_value_rejected() {
        let form = FilterForm {
            operator: Some(FilterOperator::Or),
            conditions: vec![seen(Comparison::Is), FilterCondition::default()],
        };
        assert_eq!(form.build(), Err(FilterError::EmptyValue(1)));
        assert_eq!(FilterError::EmptyValue(1).to_string(), "Condition 2 needs a value");
    }
}
