//! Node rewrites applied as each physical node is built.

use super::node::SqlNode;
use crate::logical::Qualifier;

/// A pure rewrite of one physical node.
pub trait Optimizer: Send + Sync {
    fn name(&self) -> &'static str;

    fn optimize(&self, node: SqlNode) -> SqlNode;
}

/// Fold every identifier-like part of a node with `fold`.
///
/// Explicit aliases (`sink`, `stage`, derived and function tables) and string
/// data are left alone; a self-aliased table folds its alias together with its
/// name, and a dataset name stored as data folds like the table it names.
/// User-defined function names fold like any other identifier.
fn fold_identifiers(node: SqlNode, fold: fn(&str) -> String) -> SqlNode {
    let fold_qualifier = |q: Qualifier| match q {
        Qualifier::Table(name) => Qualifier::Table(fold(&name)),
        alias @ Qualifier::Alias(_) => alias,
    };
    match node {
        SqlNode::Table {
            database,
            schema,
            name,
            alias,
        } => SqlNode::Table {
            database: database.map(|d| fold(&d)),
            schema: schema.map(|s| fold(&s)),
            name: fold(&name),
            alias: fold_qualifier(alias),
        },
        SqlNode::Column { qualifier, name } => SqlNode::Column {
            qualifier: qualifier.map(fold_qualifier),
            name: fold(&name),
        },
        SqlNode::ColumnDefinition {
            name,
            data_type,
            nullable,
            primary_key,
            unique,
        } => SqlNode::ColumnDefinition {
            name: fold(&name),
            data_type,
            nullable,
            primary_key,
            unique,
        },
        SqlNode::Alias { alias } => SqlNode::Alias {
            alias: fold(&alias),
        },
        SqlNode::NameLiteral(name) => SqlNode::NameLiteral(fold(&name)),
        SqlNode::DigestUdf { udf_name } => SqlNode::DigestUdf {
            udf_name: fold(&udf_name),
        },
        SqlNode::FunctionTable { function, alias } => SqlNode::FunctionTable {
            function: fold(&function),
            alias,
        },
        other => other,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UpperCaseOptimizer;

impl Optimizer for UpperCaseOptimizer {
    fn name(&self) -> &'static str {
        "upper_case"
    }

    fn optimize(&self, node: SqlNode) -> SqlNode {
        fold_identifiers(node, str::to_uppercase)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LowerCaseOptimizer;

impl Optimizer for LowerCaseOptimizer {
    fn name(&self) -> &'static str {
        "lower_case"
    }

    fn optimize(&self, node: SqlNode) -> SqlNode {
        fold_identifiers(node, str::to_lowercase)
    }
}
