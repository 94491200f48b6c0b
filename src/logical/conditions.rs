//! Boolean conditions used in `WHERE`, `ON` and `WHEN` clauses.

use super::values::Value;
use super::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InList {
    Values(Vec<Value>),
    Selection(Box<Selection>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
    Exists(Box<Selection>),
    Comparison {
        op: ComparisonOp,
        left: Value,
        right: Value,
    },
    In {
        value: Value,
        list: InList,
        negated: bool,
    },
    IsNull {
        value: Value,
        negated: bool,
    },
}

impl Condition {
    /// Conjunction. A single condition is returned as-is.
    pub fn and(mut conditions: Vec<Condition>) -> Condition {
        if conditions.len() == 1 {
            return conditions.remove(0);
        }
        Condition::And(conditions)
    }

    /// Disjunction. A single condition is returned as-is.
    pub fn or(mut conditions: Vec<Condition>) -> Condition {
        if conditions.len() == 1 {
            return conditions.remove(0);
        }
        Condition::Or(conditions)
    }

    pub fn exists(selection: Selection) -> Condition {
        Condition::Exists(Box::new(selection))
    }

    pub fn negate(self) -> Condition {
        Condition::Not(Box::new(self))
    }
}
