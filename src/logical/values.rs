//! Scalar values: columns, literals, functions and the staged-file pseudo-columns.

use super::conditions::{ComparisonOp, Condition};
use super::dataset::Qualifier;
use super::schema::{DataType, FieldType};
use super::Selection;

/// Functions the planners emit. Dialects may remap the rendered name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FunctionName {
    Coalesce,
    Max,
    Min,
    Count,
    Upper,
    Lower,
    CurrentTimestamp,
    ObjectConstruct,
    ParseJson,
    ToDate,
    ToTimestamp,
    ParseDatetime,
    Table,
    /// Any other function, rendered verbatim in upper case.
    Named(String),
}

impl FunctionName {
    pub fn as_str(&self) -> &str {
        match self {
            FunctionName::Coalesce => "COALESCE",
            FunctionName::Max => "MAX",
            FunctionName::Min => "MIN",
            FunctionName::Count => "COUNT",
            FunctionName::Upper => "UPPER",
            FunctionName::Lower => "LOWER",
            FunctionName::CurrentTimestamp => "CURRENT_TIMESTAMP",
            FunctionName::ObjectConstruct => "OBJECT_CONSTRUCT",
            FunctionName::ParseJson => "PARSE_JSON",
            FunctionName::ToDate => "TO_DATE",
            FunctionName::ToTimestamp => "TO_TIMESTAMP",
            FunctionName::ParseDatetime => "PARSE_DATETIME",
            FunctionName::Table => "TABLE",
            FunctionName::Named(name) => name,
        }
    }
}

/// A column reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub qualifier: Option<Qualifier>,
    pub name: String,
}

impl FieldValue {
    /// Unqualified column, as used in insert column lists.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionImpl {
    pub name: FunctionName,
    pub arguments: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastFunction {
    pub value: Box<Value>,
    pub field_type: FieldType,
}

/// Row digest computed by a hashing UDF over `OBJECT_CONSTRUCT`-style
/// name/value pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct DigestUdf {
    pub udf_name: String,
    /// Alternating column-name literals and values.
    pub arguments: Vec<Value>,
}

impl DigestUdf {
    pub fn new(
        udf_name: impl Into<String>,
        fields: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        let arguments = fields
            .into_iter()
            .flat_map(|(name, value)| [Value::String(name), value])
            .collect();
        Self {
            udf_name: udf_name.into(),
            arguments,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistinctFunction {
    pub value: Box<Value>,
}

/// A positional column of a staged file.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedFilesFieldValue {
    /// 1-based column position in the file.
    pub column_number: u32,
    /// Path inside a semi-structured row (`$1:path`).
    pub element_path: Option<String>,
    pub field_type: FieldType,
    pub file_format: super::dataset::FileFormat,
    pub dataset_alias: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Field(FieldValue),
    String(String),
    /// Name of a dataset stored as data (batch metadata, lock rows).
    /// Follows identifier case folding.
    DatasetName(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Null,
    /// A fixed datetime literal such as the open-ended time sentinel.
    DateTime(String),
    /// The execution timestamp of the batch being generated.
    BatchStartTimestamp,
    /// The wall-clock time at which the statement runs.
    BatchEndTimestamp,
    Function(FunctionImpl),
    Cast(CastFunction),
    DigestUdf(DigestUdf),
    Distinct(DistinctFunction),
    StagedFilesField(StagedFilesFieldValue),
    MetadataFileName,
    MetadataRowNumber,
    /// Scalar subquery.
    Select(Box<Selection>),
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Value>,
        right: Box<Value>,
    },
    /// `*`
    All,
    Aliased {
        value: Box<Value>,
        alias: String,
    },
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn function(name: FunctionName, arguments: Vec<Value>) -> Self {
        Value::Function(FunctionImpl { name, arguments })
    }

    pub fn cast(self, field_type: impl Into<FieldType>) -> Self {
        Value::Cast(CastFunction {
            value: Box::new(self),
            field_type: field_type.into(),
        })
    }

    pub fn distinct(self) -> Self {
        Value::Distinct(DistinctFunction {
            value: Box::new(self),
        })
    }

    pub fn subquery(selection: Selection) -> Self {
        Value::Select(Box::new(selection))
    }

    pub fn alias(self, alias: impl Into<String>) -> Self {
        Value::Aliased {
            value: Box::new(self),
            alias: alias.into(),
        }
    }

    pub fn plus(self, right: Value) -> Self {
        Value::Arithmetic {
            op: ArithmeticOp::Plus,
            left: Box::new(self),
            right: Box::new(right),
        }
    }

    pub fn minus(self, right: Value) -> Self {
        Value::Arithmetic {
            op: ArithmeticOp::Minus,
            left: Box::new(self),
            right: Box::new(right),
        }
    }

    /// `COUNT(*)`
    pub fn count_all() -> Self {
        Value::function(FunctionName::Count, vec![Value::All])
    }

    /// A literal typed after the column it is compared with: quoted for
    /// character columns, raw otherwise.
    pub fn typed_literal(data_type: DataType, raw: &str) -> Option<Self> {
        if data_type.is_string() {
            return Some(Value::string(raw));
        }
        match data_type {
            DataType::Boolean => raw.parse::<bool>().ok().map(Value::Boolean),
            dt if dt.is_integral() => raw.parse::<i64>().ok().map(Value::Integer),
            DataType::Float | DataType::Double | DataType::Real => {
                raw.parse::<f64>().ok().map(Value::Double)
            }
            _ => Some(Value::string(raw)),
        }
    }

    fn compare(self, op: ComparisonOp, right: Value) -> Condition {
        Condition::Comparison {
            op,
            left: self,
            right,
        }
    }

    pub fn equals(self, right: Value) -> Condition {
        self.compare(ComparisonOp::Eq, right)
    }

    pub fn not_equals(self, right: Value) -> Condition {
        self.compare(ComparisonOp::Ne, right)
    }

    pub fn gte(self, right: Value) -> Condition {
        self.compare(ComparisonOp::Gte, right)
    }

    pub fn lte(self, right: Value) -> Condition {
        self.compare(ComparisonOp::Lte, right)
    }

    pub fn is_in(self, list: Vec<Value>) -> Condition {
        Condition::In {
            value: self,
            list: super::conditions::InList::Values(list),
            negated: false,
        }
    }

    pub fn not_in(self, list: Vec<Value>) -> Condition {
        Condition::In {
            value: self,
            list: super::conditions::InList::Values(list),
            negated: true,
        }
    }

    pub fn in_selection(self, selection: Selection) -> Condition {
        Condition::In {
            value: self,
            list: super::conditions::InList::Selection(Box::new(selection)),
            negated: false,
        }
    }

    pub fn is_null(self) -> Condition {
        Condition::IsNull {
            value: self,
            negated: false,
        }
    }
}
