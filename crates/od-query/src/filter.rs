//! The `Q` filter-expression tree.
//!
//! A `Q` node holds an ordered list of children, each either a leaf
//! condition or a nested sub-expression, joined by one logical connector.
//! Composition (`&`, `|`, `!`) always produces a new node; operands are
//! consumed or cloned, never mutated, so a sub-expression can be reused in
//! several composed queries.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::value::Value;

/// Logical connector joining the children of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    /// The OData keyword for this connector.
    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::And => "and",
            Connector::Or => "or",
        }
    }
}

/// Comparison operator of a leaf condition.
///
/// The `in` lookup operator does not appear here: it is expanded into an
/// `or`-joined group of `eq` conditions when the lookup is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Operator {
    /// The OData keyword for this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Ge => "ge",
            Operator::Lt => "lt",
            Operator::Le => "le",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(Operator::Eq),
            "ne" => Some(Operator::Ne),
            "gt" => Some(Operator::Gt),
            "ge" => Some(Operator::Ge),
            "lt" => Some(Operator::Lt),
            "le" => Some(Operator::Le),
            _ => None,
        }
    }
}

/// Literal annotation controlling how the value is rendered on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    Guid,
    Datetime,
}

impl Annotation {
    /// The literal prefix for this annotation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Annotation::Guid => "guid",
            Annotation::Datetime => "datetime",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token {
            "guid" => Some(Annotation::Guid),
            "datetime" => Some(Annotation::Datetime),
            _ => None,
        }
    }
}

/// A leaf condition: `<field> <op> <value>`.
#[derive(Debug, Clone)]
struct Condition {
    field: String,
    operator: Operator,
    value: Value,
    annotation: Option<Annotation>,
}

impl Condition {
    fn render(&self, field_mapping: &HashMap<String, String>) -> String {
        let field = field_mapping
            .get(&self.field)
            .map(String::as_str)
            .unwrap_or(&self.field);
        let value = match self.annotation {
            Some(annotation) => format!("{}'{}'", annotation.as_str(), self.value.raw()),
            None => self.value.literal(),
        };
        format!("{} {} {}", field, self.operator.as_str(), value)
    }
}

#[derive(Debug, Clone)]
enum Node {
    Condition(Condition),
    Expr(Q),
}

/// The parsed parts of a `field[__operator][__annotation]` lookup.
struct Lookup {
    field: String,
    operator: LookupOperator,
    annotation: Option<Annotation>,
}

enum LookupOperator {
    Compare(Operator),
    In,
}

impl Lookup {
    fn parse(lookup: &str) -> Result<Self> {
        let parts: Vec<&str> = lookup.split("__").collect();
        if parts.len() > 3 {
            return Err(Error::InvalidLookup {
                lookup: lookup.to_string(),
                reason: "at most field__operator__annotation segments are allowed".to_string(),
            });
        }
        if parts[0].is_empty() {
            return Err(Error::InvalidLookup {
                lookup: lookup.to_string(),
                reason: "empty field name".to_string(),
            });
        }

        let operator = match parts.get(1).copied() {
            None => LookupOperator::Compare(Operator::Eq),
            Some("in") => LookupOperator::In,
            Some(token) => LookupOperator::Compare(Operator::parse(token).ok_or_else(|| {
                Error::UnsupportedOperator {
                    operator: token.to_string(),
                    lookup: lookup.to_string(),
                }
            })?),
        };

        let annotation = match parts.get(2).copied() {
            None => None,
            Some(token) => {
                Some(
                    Annotation::parse(token).ok_or_else(|| Error::UnsupportedAnnotation {
                        annotation: token.to_string(),
                        lookup: lookup.to_string(),
                    })?,
                )
            }
        };

        Ok(Lookup {
            field: parts[0].to_string(),
            operator,
            annotation,
        })
    }
}

/// A boolean filter expression tree rendering to OData `$filter` syntax.
///
/// See the crate-level docs for the lookup grammar and composition rules.
#[derive(Debug, Clone)]
pub struct Q {
    children: Vec<Node>,
    connector: Connector,
    negated: bool,
}

impl Q {
    /// Build a single-condition expression from a
    /// `field[__operator][__annotation]` lookup.
    ///
    /// The operator defaults to `eq` when omitted. `in` lookups take a value
    /// list and go through [`Q::new_in`] instead.
    pub fn new(lookup: &str, value: impl Into<Value>) -> Result<Self> {
        let parsed = Lookup::parse(lookup)?;
        let operator = match parsed.operator {
            LookupOperator::Compare(op) => op,
            LookupOperator::In => {
                return Err(Error::InvalidLookup {
                    lookup: lookup.to_string(),
                    reason: "the 'in' operator takes a value list; use Q::new_in".to_string(),
                })
            }
        };
        Ok(Q {
            children: vec![Node::Condition(Condition {
                field: parsed.field,
                operator,
                value: value.into(),
                annotation: parsed.annotation,
            })],
            connector: Connector::And,
            negated: false,
        })
    }

    /// Build an `in` lookup: `field eq v1 or field eq v2 or ...`.
    ///
    /// The expansion into `eq` conditions happens here, eagerly, in list
    /// order. The lookup may be a bare field name or carry an explicit
    /// `__in` operator segment and an annotation. An empty value list is a
    /// [`Error::NoConditions`] error.
    pub fn new_in<I, V>(lookup: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let parsed = Lookup::parse(lookup)?;
        if let LookupOperator::Compare(op) = parsed.operator {
            if op != Operator::Eq || lookup.contains("__") {
                return Err(Error::InvalidLookup {
                    lookup: lookup.to_string(),
                    reason: "expected an 'in' lookup or a bare field name".to_string(),
                });
            }
        }

        let children: Vec<Node> = values
            .into_iter()
            .map(|value| {
                Node::Condition(Condition {
                    field: parsed.field.clone(),
                    operator: Operator::Eq,
                    value: value.into(),
                    annotation: parsed.annotation,
                })
            })
            .collect();
        if children.is_empty() {
            return Err(Error::NoConditions);
        }

        Ok(Q {
            children,
            connector: Connector::Or,
            negated: false,
        })
    }

    /// Combine several expressions with `and` (the positional-argument form
    /// of construction). An empty iterator is a [`Error::NoConditions`]
    /// error.
    pub fn group<I>(nodes: I) -> Result<Self>
    where
        I: IntoIterator<Item = Q>,
    {
        let children: Vec<Node> = nodes.into_iter().map(Node::Expr).collect();
        if children.is_empty() {
            return Err(Error::NoConditions);
        }
        Ok(Q {
            children,
            connector: Connector::And,
            negated: false,
        })
    }

    /// Combine with another expression using `and`.
    pub fn and(self, other: Q) -> Q {
        self.combine(other, Connector::And)
    }

    /// Combine with another expression using `or`.
    pub fn or(self, other: Q) -> Q {
        self.combine(other, Connector::Or)
    }

    /// Toggle negation. Children are untouched.
    pub fn negate(mut self) -> Q {
        self.negated = !self.negated;
        self
    }

    /// Whether this node is negated.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// The connector joining this node's children.
    pub fn connector(&self) -> Connector {
        self.connector
    }

    fn combine(self, other: Q, connector: Connector) -> Q {
        Q {
            children: vec![Node::Expr(self), Node::Expr(other)],
            connector,
            negated: false,
        }
    }

    /// Render the expression to an OData `$filter` string.
    pub fn render(&self) -> String {
        self.render_with(&HashMap::new())
    }

    /// Render with a logical-name → wire-alias field mapping applied to
    /// every condition.
    pub fn render_with(&self, field_mapping: &HashMap<String, String>) -> String {
        let expr = self.render_expr(field_mapping);
        if self.negated {
            format!("not ({expr})")
        } else {
            expr
        }
    }

    fn render_expr(&self, field_mapping: &HashMap<String, String>) -> String {
        let joining = self.children.len() > 1;
        let parts: Vec<String> = self
            .children
            .iter()
            .map(|child| match child {
                Node::Condition(condition) => condition.render(field_mapping),
                Node::Expr(q) => {
                    let expr = q.render_expr(field_mapping);
                    if q.negated {
                        format!("not ({expr})")
                    } else if joining
                        && self.connector == Connector::And
                        && q.effective_connector() == Some(Connector::Or)
                    {
                        // `and` binds tighter than `or` on the wire; an
                        // or-joined group inside an and-join must keep its
                        // grouping.
                        format!("({expr})")
                    } else {
                        expr
                    }
                }
            })
            .collect();
        parts.join(&format!(" {} ", self.connector.as_str()))
    }

    /// The connector the rendered string exposes at its top level, if the
    /// rendering is a compound expression. Negated and single-condition
    /// nodes expose none.
    fn effective_connector(&self) -> Option<Connector> {
        if self.children.len() > 1 {
            return Some(self.connector);
        }
        match self.children.first() {
            Some(Node::Expr(q)) if !q.negated => q.effective_connector(),
            _ => None,
        }
    }
}

impl fmt::Display for Q {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl std::ops::BitAnd for Q {
    type Output = Q;

    fn bitand(self, rhs: Q) -> Q {
        self.and(rhs)
    }
}

impl std::ops::BitOr for Q {
    type Output = Q;

    fn bitor(self, rhs: Q) -> Q {
        self.or(rhs)
    }
}

impl std::ops::Not for Q {
    type Output = Q;

    fn not(self) -> Q {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn test_default_operator_is_eq() {
        let q = Q::new("name", "Ivanov").unwrap();
        assert_eq!(q.render(), "name eq 'Ivanov'");
    }

    #[test]
    fn test_explicit_operators() {
        for (lookup, expected) in [
            ("age__eq", "age eq 30"),
            ("age__ne", "age ne 30"),
            ("age__gt", "age gt 30"),
            ("age__ge", "age ge 30"),
            ("age__lt", "age lt 30"),
            ("age__le", "age le 30"),
        ] {
            let q = Q::new(lookup, 30).unwrap();
            assert_eq!(q.render(), expected);
        }
    }

    #[test]
    fn test_unsupported_operator() {
        let err = Q::new("age__foo", 30).unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedOperator {
                operator: "foo".to_string(),
                lookup: "age__foo".to_string(),
            }
        );
    }

    #[test]
    fn test_unsupported_annotation() {
        let err = Q::new("uid__eq__binary", "x").unwrap_err();
        assert!(matches!(err, Error::UnsupportedAnnotation { .. }));
    }

    #[test]
    fn test_too_many_segments() {
        let err = Q::new("a__eq__guid__extra", "x").unwrap_err();
        assert!(matches!(err, Error::InvalidLookup { .. }));
    }

    #[test]
    fn test_guid_annotation_wraps_raw_value() {
        let q = Q::new("uid__eq__guid", "e09df266-7bf4-11e2-9362-001b11b25590").unwrap();
        assert_eq!(
            q.render(),
            "uid eq guid'e09df266-7bf4-11e2-9362-001b11b25590'"
        );
    }

    #[test]
    fn test_datetime_annotation_wraps_raw_value() {
        let q = Q::new("date__ge__datetime", "2024-12-07T10:00:00").unwrap();
        assert_eq!(q.render(), "date ge datetime'2024-12-07T10:00:00'");
    }

    #[test]
    fn test_typed_datetime_value_needs_no_annotation() {
        let dt = NaiveDate::from_ymd_opt(2024, 12, 7)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let q = Q::new("date__gt", dt).unwrap();
        assert_eq!(q.render(), "date gt datetime'2024-12-07T10:00:00'");
    }

    #[test]
    fn test_typed_guid_value_needs_no_annotation() {
        let uid = Uuid::parse_str("e09df266-7bf4-11e2-9362-001b11b25590").unwrap();
        let q = Q::new("ref_key", uid).unwrap();
        assert_eq!(
            q.render(),
            "ref_key eq guid'e09df266-7bf4-11e2-9362-001b11b25590'"
        );
    }

    #[test]
    fn test_bool_value() {
        let q = Q::new("deleted", false).unwrap();
        assert_eq!(q.render(), "deleted eq false");
    }

    #[test]
    fn test_in_expands_to_or_joined_eq_in_list_order() {
        let q = Q::new_in("code__in", ["ABC", "XYZ", "123"]).unwrap();
        assert_eq!(
            q.render(),
            "code eq 'ABC' or code eq 'XYZ' or code eq '123'"
        );
    }

    #[test]
    fn test_in_accepts_bare_field_name() {
        let q = Q::new_in("code", ["A", "B"]).unwrap();
        assert_eq!(q.render(), "code eq 'A' or code eq 'B'");
    }

    #[test]
    fn test_in_with_annotation() {
        let q = Q::new_in(
            "ref__in__guid",
            [
                "11111111-2222-3333-4444-555555555555",
                "66666666-7777-8888-9999-000000000000",
            ],
        )
        .unwrap();
        assert_eq!(
            q.render(),
            "ref eq guid'11111111-2222-3333-4444-555555555555' \
             or ref eq guid'66666666-7777-8888-9999-000000000000'"
        );
    }

    #[test]
    fn test_empty_in_list_is_an_error() {
        let err = Q::new_in("code__in", Vec::<String>::new()).unwrap_err();
        assert_eq!(err, Error::NoConditions);
    }

    #[test]
    fn test_in_rejects_other_operators() {
        let err = Q::new_in("code__gt", ["A"]).unwrap_err();
        assert!(matches!(err, Error::InvalidLookup { .. }));
    }

    #[test]
    fn test_new_rejects_in_lookup() {
        let err = Q::new("code__in", "A").unwrap_err();
        assert!(matches!(err, Error::InvalidLookup { .. }));
    }

    #[test]
    fn test_empty_group_is_an_error() {
        let err = Q::group(Vec::<Q>::new()).unwrap_err();
        assert_eq!(err, Error::NoConditions);
    }

    #[test]
    fn test_group_joins_with_and() {
        let q = Q::group([
            Q::new("name", "Ivanov").unwrap(),
            Q::new("age__gt", 30).unwrap(),
        ])
        .unwrap();
        assert_eq!(q.render(), "name eq 'Ivanov' and age gt 30");
    }

    #[test]
    fn test_and_or_combination() {
        let q = Q::new("name", "Ivanov").unwrap()
            & (Q::new("age__gt", 30).unwrap() | Q::new("age__lt", 10).unwrap());
        assert_eq!(q.render(), "name eq 'Ivanov' and (age gt 30 or age lt 10)");
    }

    #[test]
    fn test_and_inside_or_needs_no_grouping() {
        let q = (Q::new("a", 1).unwrap() & Q::new("b", 2).unwrap()) | Q::new("c", 3).unwrap();
        assert_eq!(q.render(), "a eq 1 and b eq 2 or c eq 3");
    }

    #[test]
    fn test_in_group_keeps_grouping_under_and() {
        let q = Q::new_in("code", ["A", "B"]).unwrap() & Q::new("active", true).unwrap();
        assert_eq!(
            q.render(),
            "(code eq 'A' or code eq 'B') and active eq true"
        );
    }

    #[test]
    fn test_negation_wraps_with_not() {
        let q = !Q::new("code", "X").unwrap();
        assert_eq!(q.render(), "not (code eq 'X')");
    }

    #[test]
    fn test_negated_child_wraps_before_joining() {
        let q = Q::new("a", 1).unwrap() & !Q::new("b", 2).unwrap();
        assert_eq!(q.render(), "a eq 1 and not (b eq 2)");
    }

    #[test]
    fn test_double_negation_cancels_structurally() {
        let q = Q::new("name", "Ivanov").unwrap();
        let double = q.clone().negate().negate();
        assert!(!double.is_negated());
        assert_eq!(double.render(), q.render());
    }

    #[test]
    fn test_combination_does_not_mutate_operands() {
        let a = Q::new("name", "Ivanov").unwrap();
        let b = Q::new("age__gt", 30).unwrap();
        let a_before = a.render();
        let b_before = b.render();

        let combined = a.clone() & b.clone();
        assert_eq!(combined.render(), "name eq 'Ivanov' and age gt 30");
        assert_eq!(a.render(), a_before);
        assert_eq!(b.render(), b_before);
    }

    #[test]
    fn test_field_mapping_substitutes_wire_names() {
        let mapping: HashMap<String, String> = [
            ("name".to_string(), "Description".to_string()),
            ("age".to_string(), "Возраст".to_string()),
        ]
        .into();
        let q = Q::new("name", "Ivanov").unwrap() & Q::new("age__gt", 30).unwrap();
        assert_eq!(
            q.render_with(&mapping),
            "Description eq 'Ivanov' and Возраст gt 30"
        );
    }

    #[test]
    fn test_unmapped_fields_pass_through() {
        let mapping: HashMap<String, String> =
            [("name".to_string(), "Description".to_string())].into();
        let q = Q::new("code", "0001").unwrap();
        assert_eq!(q.render_with(&mapping), "code eq '0001'");
    }

    #[test]
    fn test_display_matches_render() {
        let q = Q::new("name", "Ivanov").unwrap();
        assert_eq!(q.to_string(), q.render());
    }
}
