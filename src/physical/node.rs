//! Physical plan nodes.
//!
//! A [`SqlNode`] holds only its own attributes; its operands are the node's
//! children in the [`super::PhysicalPlan`] arena, in the order they were
//! pushed. Statements find their parts by the [`NodeClass`] of each child
//! (the table, the column list, the source query, the condition).

use crate::logical::{ArithmeticOp, ComparisonOp, IcebergProperties, Qualifier};

#[derive(Debug, Clone, PartialEq)]
pub enum SqlNode {
    // ---- statements -------------------------------------------------------
    /// children: table, column definitions, optional table properties
    CreateTable { if_not_exists: bool },
    /// children: table, optional table properties, column definition
    AlterTable { action: AlterAction },
    /// children: table, columns, select
    Insert,
    /// children: table, assignments, optional condition
    Update,
    /// children: table, optional condition
    Delete { where_required: bool },
    /// children: table
    DropTable { if_exists: bool, cascade: bool },
    /// children: target table, source (table or derived table), condition, clauses
    Merge,
    /// children: optional condition, assignments
    WhenMatchedUpdate,
    /// children: optional condition
    WhenMatchedDelete,
    /// children: optional condition, `columns` columns, then values
    WhenNotMatchedInsert { columns: usize },
    /// children: table, columns, select, copy options
    Copy,
    CopyOptions {
        file_format: String,
        format_options: Vec<(String, String)>,
        files: Vec<String>,
        patterns: Vec<String>,
        on_error: Option<String>,
    },
    /// children: values, sources, optional condition
    Select,

    // ---- datasets ---------------------------------------------------------
    Table {
        database: Option<String>,
        schema: Option<String>,
        name: String,
        alias: Qualifier,
    },
    /// children: select
    DerivedTable { alias: String },
    StagedFilesTable { location: String, alias: String },
    /// `TABLE(<function>(args)) as alias`. children: arguments
    FunctionTable { function: String, alias: String },
    TableProperties {
        iceberg: Option<IcebergProperties>,
        tags: Vec<(String, String)>,
    },
    ColumnDefinition {
        name: String,
        data_type: String,
        nullable: bool,
        primary_key: bool,
        unique: bool,
    },

    // ---- values -----------------------------------------------------------
    Column {
        qualifier: Option<Qualifier>,
        name: String,
    },
    /// A positional staged-file column, `alias.$1` or `alias.$1:path`,
    /// optionally wrapped in a conversion function.
    StagedColumn {
        qualifier: String,
        position: u32,
        path: Option<String>,
        function: Option<String>,
    },
    StringLiteral(String),
    /// A table name stored as data; case-folded with identifiers.
    NameLiteral(String),
    IntegerLiteral(i64),
    FloatLiteral(f64),
    BooleanLiteral(bool),
    Null,
    /// `'value'`, or `FUNC('format','value')` when the sink parses datetimes.
    DatetimeLiteral {
        value: String,
        parse: Option<(String, String)>,
    },
    /// children: arguments
    Function { name: String },
    /// children: value
    Cast { data_type: String },
    /// `UDF(OBJECT_CONSTRUCT(args))`. children: alternating names and values
    DigestUdf { udf_name: String },
    /// children: value
    Distinct,
    /// Fixed pseudo-column such as `METADATA$FILENAME`.
    PseudoColumn(String),
    /// children: select
    ScalarSubquery,
    /// children: left, right
    Arithmetic { op: ArithmeticOp },
    Star,
    /// children: value
    Alias { alias: String },

    // ---- conditions -------------------------------------------------------
    /// children: conditions
    And,
    /// children: conditions
    Or,
    /// children: condition
    Not,
    /// children: select
    Exists,
    /// children: left, right
    Comparison { op: ComparisonOp },
    /// children: value, then list values or a select
    In { negated: bool },
    /// children: value
    IsNull { negated: bool },

    // ---- clauses ----------------------------------------------------------
    /// children: column, value
    Assignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlterAction {
    /// `ADD COLUMN <definition>`
    AddColumn,
    /// `ALTER COLUMN <definition>`
    AlterColumn,
    /// `ALTER COLUMN "c" SET DATA TYPE <type>`
    SetDataType,
    /// `ALTER COLUMN "c" DROP NOT NULL`
    DropNotNull,
}

/// Role a node plays when it appears as a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    Statement,
    Clause,
    Source,
    Properties,
    ColumnDefinition,
    Select,
    Value,
    Condition,
    Assignment,
}

impl SqlNode {
    pub fn class(&self) -> NodeClass {
        match self {
            SqlNode::CreateTable { .. }
            | SqlNode::AlterTable { .. }
            | SqlNode::Insert
            | SqlNode::Update
            | SqlNode::Delete { .. }
            | SqlNode::DropTable { .. }
            | SqlNode::Merge
            | SqlNode::Copy => NodeClass::Statement,
            SqlNode::WhenMatchedUpdate
            | SqlNode::WhenMatchedDelete
            | SqlNode::WhenNotMatchedInsert { .. }
            | SqlNode::CopyOptions { .. } => NodeClass::Clause,
            SqlNode::Table { .. }
            | SqlNode::DerivedTable { .. }
            | SqlNode::StagedFilesTable { .. }
            | SqlNode::FunctionTable { .. } => NodeClass::Source,
            SqlNode::TableProperties { .. } => NodeClass::Properties,
            SqlNode::ColumnDefinition { .. } => NodeClass::ColumnDefinition,
            SqlNode::Select => NodeClass::Select,
            SqlNode::And
            | SqlNode::Or
            | SqlNode::Not
            | SqlNode::Exists
            | SqlNode::Comparison { .. }
            | SqlNode::In { .. }
            | SqlNode::IsNull { .. } => NodeClass::Condition,
            SqlNode::Assignment => NodeClass::Assignment,
            SqlNode::Column { .. }
            | SqlNode::StagedColumn { .. }
            | SqlNode::StringLiteral(_)
            | SqlNode::NameLiteral(_)
            | SqlNode::IntegerLiteral(_)
            | SqlNode::FloatLiteral(_)
            | SqlNode::BooleanLiteral(_)
            | SqlNode::Null
            | SqlNode::DatetimeLiteral { .. }
            | SqlNode::Function { .. }
            | SqlNode::DigestUdf { .. }
            | SqlNode::Cast { .. }
            | SqlNode::Distinct
            | SqlNode::PseudoColumn(_)
            | SqlNode::ScalarSubquery
            | SqlNode::Arithmetic { .. }
            | SqlNode::Star
            | SqlNode::Alias { .. } => NodeClass::Value,
        }
    }
}
