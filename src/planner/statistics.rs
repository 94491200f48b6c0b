//! Statistics queries: one `SELECT` returning one aliased number each.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::logical::{Condition, DatasetReference, Selection, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatisticName {
    IncomingRecordCount,
    RowsInserted,
    RowsUpdated,
    RowsDeleted,
    RowsTerminated,
}

impl StatisticName {
    /// Column alias of the query result.
    pub fn alias(&self) -> &'static str {
        match self {
            StatisticName::IncomingRecordCount => "incomingRecordCount",
            StatisticName::RowsInserted => "rowsInserted",
            StatisticName::RowsUpdated => "rowsUpdated",
            StatisticName::RowsDeleted => "rowsDeleted",
            StatisticName::RowsTerminated => "rowsTerminated",
        }
    }
}

impl fmt::Display for StatisticName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

/// `SELECT COUNT(*) FROM <dataset> [WHERE <condition>]`
pub fn count_of(dataset: DatasetReference, condition: Option<Condition>) -> Selection {
    Selection::of(vec![Value::count_all()])
        .from(dataset)
        .filter_opt(condition)
}

/// `SELECT COUNT(*) as "<name>" FROM <dataset> [WHERE <condition>]`
pub fn count(
    name: StatisticName,
    dataset: DatasetReference,
    condition: Option<Condition>,
) -> (StatisticName, Selection) {
    let selection = Selection::of(vec![Value::count_all().alias(name.alias())])
        .from(dataset)
        .filter_opt(condition);
    (name, selection)
}

/// `SELECT (<left>)-(<right>) as "<name>"`
pub fn difference(
    name: StatisticName,
    left: Selection,
    right: Selection,
) -> (StatisticName, Selection) {
    let value = Value::subquery(left)
        .minus(Value::subquery(right))
        .alias(name.alias());
    (name, Selection::of(vec![value]))
}

/// `SELECT 0 as "<name>"`
pub fn zero(name: StatisticName) -> (StatisticName, Selection) {
    (name, Selection::of(vec![Value::Integer(0).alias(name.alias())]))
}
