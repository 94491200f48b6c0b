//! Physical plan to SQL text.
//!
//! Rendering is a pure walk of the arena from the root. Separators are fixed
//! so output is byte-stable: select lists and function arguments use `,`,
//! column name lists use `, `, conjunctions parenthesize every operand.

use super::node::{AlterAction, NodeClass, SqlNode};
use super::plan::{NodeId, PhysicalPlan};
use super::{TransformError, TransformResult};
use crate::logical::{ArithmeticOp, ComparisonOp, Qualifier};
use crate::sql::{Dialect, Token, TokenStream};

pub struct Renderer<'p> {
    plan: &'p PhysicalPlan,
    dialect: Dialect,
    quote_identifiers: bool,
}

impl<'p> Renderer<'p> {
    pub fn new(plan: &'p PhysicalPlan, dialect: Dialect, quote_identifiers: bool) -> Self {
        Self {
            plan,
            dialect,
            quote_identifiers,
        }
    }

    pub fn render(&self) -> TransformResult<String> {
        let root = self
            .plan
            .root()
            .ok_or_else(|| TransformError::Internal("empty physical plan".into()))?;
        Ok(self.node(root)?.serialize(self.dialect))
    }

    fn ident(&self, name: &str) -> Token {
        if self.quote_identifiers {
            Token::Ident(name.to_string())
        } else {
            Token::BareIdent(name.to_string())
        }
    }

    fn required(&self, id: NodeId, class: NodeClass, what: &str) -> TransformResult<NodeId> {
        self.plan.child_of(id, class).ok_or_else(|| {
            TransformError::Internal(format!("{} missing under node {}", what, id))
        })
    }

    fn join(&self, ids: &[NodeId], separator: &[Token]) -> TransformResult<TokenStream> {
        let parts = ids
            .iter()
            .map(|id| self.node(*id))
            .collect::<TransformResult<Vec<_>>>()?;
        let mut ts = TokenStream::new();
        ts.join(&parts, separator);
        Ok(ts)
    }

    fn node(&self, id: NodeId) -> TransformResult<TokenStream> {
        let mut ts = TokenStream::new();
        match self.plan.node(id)? {
            // ---- statements ---------------------------------------------------
            SqlNode::CreateTable { if_not_exists } => {
                self.create_table(id, *if_not_exists, &mut ts)?;
            }
            SqlNode::AlterTable { action } => self.alter_table(id, *action, &mut ts)?,
            SqlNode::Insert => {
                let table = self.required(id, NodeClass::Source, "INSERT target")?;
                let select = self.required(id, NodeClass::Select, "INSERT source")?;
                let columns = self.plan.children_of(id, NodeClass::Value);
                ts.keyword(Token::Insert)
                    .keyword(Token::Into)
                    .append(&self.table_name(table)?)
                    .space()
                    .parenthesized(&self.join(&columns, &[Token::Comma, Token::Space])?)
                    .space()
                    .parenthesized(&self.node(select)?);
            }
            SqlNode::Update => {
                let table = self.required(id, NodeClass::Source, "UPDATE target")?;
                let assignments = self.plan.children_of(id, NodeClass::Assignment);
                ts.keyword(Token::Update)
                    .append(&self.source(table)?)
                    .space()
                    .keyword(Token::Set)
                    .append(&self.join(&assignments, &[Token::Comma])?);
                if let Some(cond) = self.plan.child_of(id, NodeClass::Condition) {
                    ts.space().keyword(Token::Where).append(&self.node(cond)?);
                }
            }
            SqlNode::Delete { where_required } => {
                let table = self.required(id, NodeClass::Source, "DELETE target")?;
                ts.keyword(Token::Delete)
                    .keyword(Token::From)
                    .append(&self.source(table)?);
                match self.plan.child_of(id, NodeClass::Condition) {
                    Some(cond) => {
                        ts.space().keyword(Token::Where).append(&self.node(cond)?);
                    }
                    None if *where_required => {
                        ts.space()
                            .keyword(Token::Where)
                            .push(Token::LitInt(1))
                            .space()
                            .keyword(Token::Eq)
                            .push(Token::LitInt(1));
                    }
                    None => {}
                }
            }
            SqlNode::DropTable { if_exists, cascade } => {
                let table = self.required(id, NodeClass::Source, "DROP target")?;
                ts.keyword(Token::Drop).keyword(Token::Table);
                if *if_exists {
                    ts.keyword(Token::If).keyword(Token::Exists);
                }
                ts.append(&self.table_name(table)?);
                if *cascade {
                    ts.space().push(Token::Cascade);
                }
            }
            SqlNode::Merge => {
                let sources = self.plan.children_of(id, NodeClass::Source);
                let [target, source] = sources.as_slice() else {
                    return Err(TransformError::Internal(format!(
                        "MERGE needs a target and a source, found {}",
                        sources.len()
                    )));
                };
                let on = self.required(id, NodeClass::Condition, "MERGE condition")?;
                let clauses = self.plan.children_of(id, NodeClass::Clause);
                ts.keyword(Token::Merge)
                    .keyword(Token::Into)
                    .append(&self.source(*target)?)
                    .space()
                    .keyword(Token::Using)
                    .append(&self.source(*source)?)
                    .space()
                    .keyword(Token::On)
                    .append(&self.node(on)?);
                for clause in clauses {
                    ts.space().append(&self.node(clause)?);
                }
            }
            SqlNode::WhenMatchedUpdate => {
                self.when(id, false, &mut ts)?;
                let assignments = self.plan.children_of(id, NodeClass::Assignment);
                ts.keyword(Token::Update)
                    .keyword(Token::Set)
                    .append(&self.join(&assignments, &[Token::Comma])?);
            }
            SqlNode::WhenMatchedDelete => {
                self.when(id, false, &mut ts)?;
                ts.push(Token::Delete);
            }
            SqlNode::WhenNotMatchedInsert { columns } => {
                self.when(id, true, &mut ts)?;
                let values = self.plan.children_of(id, NodeClass::Value);
                if values.len() < *columns {
                    return Err(TransformError::Internal(format!(
                        "MERGE insert expects {} columns, found {} values",
                        columns,
                        values.len()
                    )));
                }
                let (names, exprs) = values.split_at(*columns);
                ts.keyword(Token::Insert)
                    .parenthesized(&self.join(names, &[Token::Comma, Token::Space])?)
                    .space()
                    .keyword(Token::Values)
                    .parenthesized(&self.join(exprs, &[Token::Comma])?);
            }
            SqlNode::Copy => {
                let table = self.required(id, NodeClass::Source, "COPY target")?;
                let select = self.required(id, NodeClass::Select, "COPY source")?;
                let columns = self.plan.children_of(id, NodeClass::Value);
                ts.keyword(Token::Copy)
                    .keyword(Token::Into)
                    .append(&self.table_name(table)?)
                    .space()
                    .parenthesized(&self.join(&columns, &[Token::Comma, Token::Space])?)
                    .space()
                    .keyword(Token::From)
                    .parenthesized(&self.node(select)?);
                if let Some(options) = self.plan.child_of(id, NodeClass::Clause) {
                    ts.append(&self.node(options)?);
                }
            }
            SqlNode::CopyOptions {
                file_format,
                format_options,
                files,
                patterns,
                on_error,
            } => {
                if !files.is_empty() {
                    let names: Vec<TokenStream> = files
                        .iter()
                        .map(|f| {
                            let mut t = TokenStream::new();
                            t.push(Token::LitString(f.clone()));
                            t
                        })
                        .collect();
                    let mut list = TokenStream::new();
                    list.join(&names, &[Token::Comma]);
                    ts.space()
                        .push(Token::Raw("FILES".into()))
                        .space()
                        .keyword(Token::Eq)
                        .parenthesized(&list);
                } else if !patterns.is_empty() {
                    ts.space()
                        .push(Token::Raw("PATTERN".into()))
                        .space()
                        .keyword(Token::Eq)
                        .push(Token::LitString(patterns.join("|")));
                }
                let mut format = TokenStream::new();
                format
                    .push(Token::Type)
                    .space()
                    .keyword(Token::Eq)
                    .push(Token::LitString(file_format.clone()));
                for (key, value) in format_options {
                    format
                        .comma()
                        .space()
                        .push(Token::Raw(key.to_uppercase()))
                        .space()
                        .keyword(Token::Eq)
                        .push(option_value(value));
                }
                ts.space()
                    .push(Token::Raw("FILE_FORMAT".into()))
                    .space()
                    .keyword(Token::Eq)
                    .parenthesized(&format);
                if let Some(on_error) = on_error {
                    ts.space()
                        .push(Token::Raw("ON_ERROR".into()))
                        .space()
                        .keyword(Token::Eq)
                        .push(Token::LitString(on_error.clone()));
                }
            }
            SqlNode::Select => {
                let values = self.plan.children_of(id, NodeClass::Value);
                ts.keyword(Token::Select)
                    .append(&self.join(&values, &[Token::Comma])?);
                let sources = self.plan.children_of(id, NodeClass::Source);
                if !sources.is_empty() {
                    let parts = sources
                        .iter()
                        .map(|s| self.source(*s))
                        .collect::<TransformResult<Vec<_>>>()?;
                    ts.space().keyword(Token::From).join(&parts, &[Token::Comma, Token::Space]);
                }
                if let Some(cond) = self.plan.child_of(id, NodeClass::Condition) {
                    ts.space().keyword(Token::Where).append(&self.node(cond)?);
                }
            }

            // ---- datasets -----------------------------------------------------
            SqlNode::Table { .. }
            | SqlNode::DerivedTable { .. }
            | SqlNode::StagedFilesTable { .. }
            | SqlNode::FunctionTable { .. } => {
                ts.append(&self.source(id)?);
            }
            SqlNode::TableProperties { .. } | SqlNode::ColumnDefinition { .. } => {
                return Err(TransformError::Internal(format!(
                    "node {} only renders inside a table statement",
                    id
                )));
            }

            // ---- values -------------------------------------------------------
            SqlNode::Column { qualifier, name } => {
                if let Some(q) = qualifier {
                    ts.push(Token::BareIdent(q.as_str().to_string()))
                        .push(Token::Dot);
                }
                ts.push(self.ident(name));
            }
            SqlNode::StagedColumn {
                qualifier,
                position,
                path,
                function,
            } => {
                let mut column = format!("{}.${}", qualifier, position);
                if let Some(path) = path {
                    column.push(':');
                    column.push_str(path);
                }
                let mut inner = TokenStream::new();
                inner.push(Token::Raw(column));
                match function {
                    Some(f) => ts.push(Token::FunctionName(f.clone())).parenthesized(&inner),
                    None => ts.append(&inner),
                };
            }
            SqlNode::StringLiteral(s) | SqlNode::NameLiteral(s) => {
                ts.push(Token::LitString(s.clone()));
            }
            SqlNode::IntegerLiteral(n) => {
                ts.push(Token::LitInt(*n));
            }
            SqlNode::FloatLiteral(f) => {
                ts.push(Token::LitFloat(*f));
            }
            SqlNode::BooleanLiteral(b) => {
                ts.push(Token::LitBool(*b));
            }
            SqlNode::Null => {
                ts.push(Token::Null);
            }
            SqlNode::DatetimeLiteral { value, parse } => match parse {
                Some((function, format)) => {
                    let mut args = TokenStream::new();
                    args.push(Token::LitString(format.clone()))
                        .comma()
                        .push(Token::LitString(value.clone()));
                    ts.push(Token::FunctionName(function.clone()))
                        .parenthesized(&args);
                }
                None => {
                    ts.push(Token::LitString(value.clone()));
                }
            },
            SqlNode::Function { name } => {
                let args = self.plan.children_of(id, NodeClass::Value);
                ts.push(Token::FunctionName(name.clone()))
                    .parenthesized(&self.join(&args, &[Token::Comma])?);
            }
            SqlNode::Cast { data_type } => {
                let value = self.required(id, NodeClass::Value, "CAST operand")?;
                let mut inner = self.node(value)?;
                inner
                    .space()
                    .push(Token::Raw("AS".into()))
                    .space()
                    .push(Token::Raw(data_type.clone()));
                ts.push(Token::FunctionName("CAST".into()))
                    .parenthesized(&inner);
            }
            SqlNode::DigestUdf { udf_name } => {
                let args = self.plan.children_of(id, NodeClass::Value);
                let mut object = TokenStream::new();
                object
                    .push(Token::FunctionName("OBJECT_CONSTRUCT".into()))
                    .parenthesized(&self.join(&args, &[Token::Comma])?);
                ts.push(Token::FunctionName(udf_name.clone()))
                    .parenthesized(&object);
            }
            SqlNode::Distinct => {
                let value = self.required(id, NodeClass::Value, "DISTINCT operand")?;
                ts.keyword(Token::Distinct).append(&self.node(value)?);
            }
            SqlNode::PseudoColumn(name) => {
                ts.push(Token::Raw(name.clone()));
            }
            SqlNode::ScalarSubquery => {
                let select = self.required(id, NodeClass::Select, "subquery")?;
                ts.parenthesized(&self.node(select)?);
            }
            SqlNode::Arithmetic { op } => {
                let operands = self.plan.children_of(id, NodeClass::Value);
                let [left, right] = operands.as_slice() else {
                    return Err(TransformError::Internal(format!(
                        "arithmetic needs two operands, found {}",
                        operands.len()
                    )));
                };
                let op = match op {
                    ArithmeticOp::Plus => Token::Plus,
                    ArithmeticOp::Minus => Token::Minus,
                };
                ts.append(&self.node(*left)?)
                    .push(op)
                    .append(&self.node(*right)?);
            }
            SqlNode::Star => {
                ts.push(Token::Star);
            }
            SqlNode::Alias { alias } => {
                let value = self.required(id, NodeClass::Value, "aliased value")?;
                ts.append(&self.node(value)?)
                    .space()
                    .keyword(Token::As)
                    .push(self.ident(alias));
            }

            // ---- conditions ---------------------------------------------------
            SqlNode::And | SqlNode::Or => {
                let separator = if matches!(self.plan.node(id)?, SqlNode::And) {
                    Token::And
                } else {
                    Token::Or
                };
                let operands = self.plan.children_of(id, NodeClass::Condition);
                let parts = operands
                    .iter()
                    .map(|c| {
                        let mut t = TokenStream::new();
                        t.parenthesized(&self.node(*c)?);
                        Ok(t)
                    })
                    .collect::<TransformResult<Vec<_>>>()?;
                ts.join(&parts, &[Token::Space, separator, Token::Space]);
            }
            SqlNode::Not => {
                let cond = self.required(id, NodeClass::Condition, "NOT operand")?;
                ts.keyword(Token::Not).parenthesized(&self.node(cond)?);
            }
            SqlNode::Exists => {
                let select = self.required(id, NodeClass::Select, "EXISTS subquery")?;
                ts.keyword(Token::Exists).parenthesized(&self.node(select)?);
            }
            SqlNode::Comparison { op } => {
                let operands = self.plan.children_of(id, NodeClass::Value);
                let [left, right] = operands.as_slice() else {
                    return Err(TransformError::Internal(format!(
                        "comparison needs two operands, found {}",
                        operands.len()
                    )));
                };
                ts.append(&self.node(*left)?)
                    .space()
                    .keyword(comparison_token(*op))
                    .append(&self.node(*right)?);
            }
            SqlNode::In { negated } => {
                let values = self.plan.children_of(id, NodeClass::Value);
                let Some((value, list)) = values.split_first() else {
                    return Err(TransformError::Internal("IN without operand".into()));
                };
                ts.append(&self.node(*value)?).space();
                if *negated {
                    ts.keyword(Token::Not);
                }
                ts.keyword(Token::In);
                match self.plan.child_of(id, NodeClass::Select) {
                    Some(select) => ts.parenthesized(&self.node(select)?),
                    None => ts.parenthesized(&self.join(list, &[Token::Comma])?),
                };
            }
            SqlNode::IsNull { negated } => {
                let value = self.required(id, NodeClass::Value, "IS NULL operand")?;
                ts.append(&self.node(value)?).space().keyword(Token::Is);
                if *negated {
                    ts.keyword(Token::Not);
                }
                ts.push(Token::Null);
            }

            // ---- clauses ------------------------------------------------------
            SqlNode::Assignment => {
                let operands = self.plan.children_of(id, NodeClass::Value);
                let [column, value] = operands.as_slice() else {
                    return Err(TransformError::Internal(format!(
                        "assignment needs a column and a value, found {}",
                        operands.len()
                    )));
                };
                ts.append(&self.node(*column)?)
                    .space()
                    .keyword(Token::Eq)
                    .append(&self.node(*value)?);
            }
        }
        Ok(ts)
    }

    /// `WHEN [NOT] MATCHED [AND <cond>] THEN `
    fn when(&self, id: NodeId, not: bool, ts: &mut TokenStream) -> TransformResult<()> {
        ts.keyword(Token::When);
        if not {
            ts.keyword(Token::Not);
        }
        ts.keyword(Token::Matched);
        if let Some(cond) = self.plan.child_of(id, NodeClass::Condition) {
            ts.keyword(Token::And).append(&self.node(cond)?).space();
        }
        ts.keyword(Token::Then);
        Ok(())
    }

    /// Fully qualified table name, without alias.
    fn table_name(&self, id: NodeId) -> TransformResult<TokenStream> {
        let SqlNode::Table {
            database,
            schema,
            name,
            ..
        } = self.plan.node(id)?
        else {
            return Err(TransformError::Internal(format!(
                "expected a table at node {}",
                id
            )));
        };
        let mut ts = TokenStream::new();
        if database.is_none() && schema.is_none() {
            ts.push(Token::BareIdent(name.clone()));
            return Ok(ts);
        }
        for part in [database, schema].into_iter().flatten() {
            ts.push(self.ident(part)).push(Token::Dot);
        }
        ts.push(self.ident(name));
        Ok(ts)
    }

    /// A dataset in `FROM`/`USING`/`UPDATE` position, with its alias.
    fn source(&self, id: NodeId) -> TransformResult<TokenStream> {
        let mut ts = TokenStream::new();
        match self.plan.node(id)? {
            SqlNode::Table { alias, .. } => {
                ts.append(&self.table_name(id)?)
                    .space()
                    .keyword(Token::As)
                    .push(alias_token(alias));
            }
            SqlNode::DerivedTable { alias } => {
                let select = self.required(id, NodeClass::Select, "derived table query")?;
                ts.parenthesized(&self.node(select)?)
                    .space()
                    .keyword(Token::As)
                    .push(Token::BareIdent(alias.clone()));
            }
            SqlNode::StagedFilesTable { location, alias } => {
                ts.push(Token::Raw(location.clone()))
                    .space()
                    .keyword(Token::As)
                    .push(Token::BareIdent(alias.clone()));
            }
            SqlNode::FunctionTable { function, alias } => {
                let args = self.plan.children_of(id, NodeClass::Value);
                let mut call = TokenStream::new();
                call.push(Token::FunctionName(function.clone()))
                    .parenthesized(&self.join(&args, &[Token::Comma])?);
                ts.push(Token::FunctionName("TABLE".into()))
                    .parenthesized(&call)
                    .space()
                    .keyword(Token::As)
                    .push(Token::BareIdent(alias.clone()));
            }
            other => {
                return Err(TransformError::Internal(format!(
                    "{:?} is not a dataset",
                    other
                )));
            }
        }
        Ok(ts)
    }

    fn create_table(
        &self,
        id: NodeId,
        if_not_exists: bool,
        ts: &mut TokenStream,
    ) -> TransformResult<()> {
        let table = self.required(id, NodeClass::Source, "CREATE target")?;
        let properties = self.plan.child_of(id, NodeClass::Properties);
        let (iceberg, tags) = match properties.map(|p| self.plan.node(p)).transpose()? {
            Some(SqlNode::TableProperties { iceberg, tags }) => (iceberg.as_ref(), tags.as_slice()),
            _ => (None, &[][..]),
        };

        ts.keyword(Token::Create);
        if iceberg.is_some() {
            ts.keyword(Token::Iceberg);
        }
        ts.keyword(Token::Table);
        if if_not_exists {
            ts.keyword(Token::If).keyword(Token::Not).keyword(Token::Exists);
        }
        ts.append(&self.table_name(table)?);

        let mut columns = Vec::new();
        let mut primary_keys = Vec::new();
        for col in self.plan.children_of(id, NodeClass::ColumnDefinition) {
            let SqlNode::ColumnDefinition {
                name,
                data_type,
                nullable,
                primary_key,
                unique,
            } = self.plan.node(col)?
            else {
                continue;
            };
            let mut def = TokenStream::new();
            def.push(self.ident(name))
                .space()
                .push(Token::Raw(data_type.clone()));
            if *primary_key || !*nullable {
                def.space().keyword(Token::Not).push(Token::Null);
            }
            if *unique {
                def.space().push(Token::Unique);
            }
            columns.push(def);
            if *primary_key {
                let mut pk = TokenStream::new();
                pk.push(self.ident(name));
                primary_keys.push(pk);
            }
        }
        if !primary_keys.is_empty() {
            let mut constraint = TokenStream::new();
            let mut keys = TokenStream::new();
            keys.join(&primary_keys, &[Token::Comma, Token::Space]);
            constraint
                .keyword(Token::Primary)
                .keyword(Token::Key)
                .parenthesized(&keys);
            columns.push(constraint);
        }
        let mut body = TokenStream::new();
        body.join(&columns, &[Token::Comma]);
        ts.parenthesized(&body);

        if let Some(iceberg) = iceberg {
            let settings = [
                ("CATALOG", &iceberg.catalog),
                ("EXTERNAL_VOLUME", &iceberg.external_volume),
                ("BASE_LOCATION", &iceberg.base_location),
            ];
            for (i, (key, value)) in settings.iter().enumerate() {
                if i > 0 {
                    ts.comma();
                }
                ts.space()
                    .push(Token::Raw((*key).into()))
                    .push(Token::Eq)
                    .push(Token::LitString((*value).clone()));
            }
        }
        if !tags.is_empty() {
            let parts: Vec<TokenStream> = tags
                .iter()
                .map(|(k, v)| {
                    let mut t = TokenStream::new();
                    t.push(Token::BareIdent(k.clone()))
                        .space()
                        .keyword(Token::Eq)
                        .push(Token::LitString(v.clone()));
                    t
                })
                .collect();
            let mut list = TokenStream::new();
            list.join(&parts, &[Token::Comma, Token::Space]);
            ts.space()
                .keyword(Token::With)
                .keyword(Token::Tag)
                .parenthesized(&list);
        }
        Ok(())
    }

    fn alter_table(
        &self,
        id: NodeId,
        action: AlterAction,
        ts: &mut TokenStream,
    ) -> TransformResult<()> {
        let table = self.required(id, NodeClass::Source, "ALTER target")?;
        let column = self.required(id, NodeClass::ColumnDefinition, "ALTER column")?;
        let iceberg = match self
            .plan
            .child_of(id, NodeClass::Properties)
            .map(|p| self.plan.node(p))
            .transpose()?
        {
            Some(SqlNode::TableProperties { iceberg, .. }) => iceberg.is_some(),
            _ => false,
        };
        let SqlNode::ColumnDefinition {
            name,
            data_type,
            nullable,
            primary_key,
            ..
        } = self.plan.node(column)?
        else {
            return Err(TransformError::Internal("ALTER without column".into()));
        };

        ts.keyword(Token::Alter);
        if iceberg {
            ts.keyword(Token::Iceberg);
        }
        ts.keyword(Token::Table)
            .append(&self.table_name(table)?)
            .space();

        let definition = |ts: &mut TokenStream| {
            ts.push(self.ident(name))
                .space()
                .push(Token::Raw(data_type.clone()));
            if *primary_key {
                ts.space().keyword(Token::Primary).push(Token::Key);
            } else if !*nullable {
                ts.space().keyword(Token::Not).push(Token::Null);
            }
        };
        match action {
            AlterAction::AddColumn => {
                ts.keyword(Token::Add).keyword(Token::Column);
                definition(ts);
            }
            AlterAction::AlterColumn => {
                ts.keyword(Token::Alter).keyword(Token::Column);
                definition(ts);
            }
            AlterAction::SetDataType => {
                ts.keyword(Token::Alter)
                    .keyword(Token::Column)
                    .push(self.ident(name))
                    .space()
                    .keyword(Token::Set)
                    .keyword(Token::Data)
                    .keyword(Token::Type)
                    .push(Token::Raw(data_type.clone()));
            }
            AlterAction::DropNotNull => {
                ts.keyword(Token::Alter)
                    .keyword(Token::Column)
                    .push(self.ident(name))
                    .space()
                    .keyword(Token::Drop)
                    .keyword(Token::Not)
                    .push(Token::Null);
            }
        }
        Ok(())
    }
}

fn alias_token(alias: &Qualifier) -> Token {
    Token::BareIdent(alias.as_str().to_string())
}

fn comparison_token(op: ComparisonOp) -> Token {
    match op {
        ComparisonOp::Eq => Token::Eq,
        ComparisonOp::Ne => Token::Ne,
        ComparisonOp::Lt => Token::Lt,
        ComparisonOp::Lte => Token::Lte,
        ComparisonOp::Gt => Token::Gt,
        ComparisonOp::Gte => Token::Gte,
    }
}

/// Numbers and booleans go in bare; everything else is a string literal.
fn option_value(value: &str) -> Token {
    if value.parse::<i64>().is_ok()
        || value.eq_ignore_ascii_case("true")
        || value.eq_ignore_ascii_case("false")
    {
        Token::Raw(value.to_uppercase())
    } else {
        Token::LitString(value.to_string())
    }
}
