//! Nontemporal delta: upsert staging into main without keeping history.
//!
//! Sinks with `MERGE` get a single statement. Elsewhere the upsert is an
//! `UPDATE` of changed rows followed by an `INSERT` of new ones, and with a
//! delete indicator a trailing `DELETE`.

use crate::ingest_mode::NontemporalDelta;
use crate::logical::{
    Condition, Dataset, DatasetDefinition, Delete, Merge, MergeClause, Operation, Selection,
    Update, Value,
};
use crate::sql::Capability;

use super::common::{audit_field, bare_fields, ensure_field, InsertColumns, PlanScope, STAGE};
use super::statistics::{self, StatisticName};
use super::{Planner, PlannerResult};

pub struct NontemporalDeltaPlanner<'a> {
    scope: PlanScope<'a>,
    config: &'a NontemporalDelta,
    main: DatasetDefinition,
    keys: Vec<String>,
}

impl<'a> NontemporalDeltaPlanner<'a> {
    pub fn new(scope: PlanScope<'a>, config: &'a NontemporalDelta) -> PlannerResult<Self> {
        let keys = scope.require_keys()?;
        scope.require_staging_field(&config.digest_field)?;
        scope.check_primary_keys(&scope.identity_mapping())?;

        let mut fields = scope.main.schema.fields.clone();
        if let Some(audit) = config.auditing.field() {
            ensure_field(&mut fields, audit_field(audit, false));
        }
        let main = scope.main.with_fields(fields);
        Ok(Self {
            scope,
            config,
            main,
            keys,
        })
    }

    fn digest_differs(&self) -> Condition {
        let digest = &self.config.digest_field;
        self.scope
            .sink
            .field(digest)
            .not_equals(self.scope.stage.field(digest))
    }

    fn digest_matches(&self) -> Condition {
        let digest = &self.config.digest_field;
        self.scope
            .sink
            .field(digest)
            .equals(self.scope.stage.field(digest))
    }

    fn keys_match(&self) -> Condition {
        let scope = &self.scope;
        Condition::and(
            self.keys
                .iter()
                .map(|k| scope.sink.field(k).equals(scope.stage.field(k)))
                .collect(),
        )
    }

    /// `sink.col = stage.col` for every data column, then the audit column.
    fn assignments(&self, value_of: impl Fn(&str) -> Value) -> Vec<(Value, Value)> {
        let scope = &self.scope;
        let mut assignments: Vec<(Value, Value)> = self
            .column_mapping()
            .iter()
            .map(|(from, to)| (scope.sink.field(to), value_of(from)))
            .collect();
        if let Some(audit) = self.config.auditing.field() {
            assignments.push((scope.sink.field(audit), Value::BatchStartTimestamp));
        }
        assignments
    }

    fn insert_columns(&self) -> InsertColumns {
        let mut columns = InsertColumns::mapped(&self.column_mapping(), &self.scope.stage);
        if let Some(audit) = self.config.auditing.field() {
            columns.push(audit, Value::BatchStartTimestamp);
        }
        columns
    }

    /// `SELECT stage.<data columns> FROM staging as stage`
    fn stage_columns(&self) -> Selection {
        let scope = &self.scope;
        Selection::of(
            scope
                .staging_data_fields()
                .iter()
                .map(|f| scope.stage.field(&f.name))
                .collect(),
        )
        .from(scope.stage.clone())
    }

    /// Staging rows marked as deletions that match a main row.
    fn deleted_rows(&self, with_digest: bool) -> Option<Condition> {
        let indicator = self.scope.delete_indicator.as_ref()?;
        let mut conditions: Vec<Condition> = self.scope.data_split_condition().into_iter().collect();
        conditions.push(self.keys_match());
        if with_digest {
            conditions.push(self.digest_matches());
        }
        conditions.push(indicator.deleted(&self.scope.stage));
        Some(Condition::exists(
            self.stage_columns().filter(Condition::and(conditions)),
        ))
    }

    fn merge(&self) -> Operation {
        let scope = &self.scope;
        let source = match scope.data_split_condition() {
            Some(split) => {
                let mut values: Vec<Value> = scope
                    .staging_data_fields()
                    .iter()
                    .map(|f| scope.stage.field(&f.name))
                    .collect();
                if let Some(indicator) = &scope.delete_indicator {
                    values.push(scope.stage.field(&indicator.field));
                }
                Dataset::Derived {
                    selection: Box::new(
                        Selection::of(values)
                            .from(scope.stage.clone())
                            .filter(split),
                    ),
                    alias: STAGE.to_string(),
                }
            }
            None => Dataset::Reference(scope.stage.clone()),
        };

        let mut clauses = Vec::new();
        let mut update_condition = self.digest_differs();
        let mut insert_condition = None;
        if let Some(indicator) = &scope.delete_indicator {
            clauses.push(MergeClause::MatchedDelete {
                condition: Some(indicator.deleted(&scope.stage)),
            });
            update_condition =
                Condition::and(vec![update_condition, indicator.kept(&scope.stage)]);
            insert_condition = Some(indicator.kept(&scope.stage));
        }
        clauses.push(MergeClause::MatchedUpdate {
            condition: Some(update_condition),
            assignments: self.assignments(|from| scope.stage.field(from)),
        });
        let columns = self.insert_columns();
        clauses.push(MergeClause::NotMatchedInsert {
            condition: insert_condition,
            fields: bare_fields(columns.names.iter().map(String::as_str)),
            values: columns.values,
        });

        Operation::Merge(Merge {
            target: scope.sink.clone(),
            source,
            on: self.keys_match(),
            clauses,
        })
    }

    fn update_insert_delete(&self) -> Vec<Operation> {
        let scope = &self.scope;
        let split = scope.data_split_condition();

        let mut changed: Vec<Condition> = split.clone().into_iter().collect();
        changed.push(self.keys_match());
        changed.push(self.digest_differs());
        let changed = Condition::and(changed);

        let update = Operation::Update(Update {
            dataset: scope.sink.clone(),
            assignments: self.assignments(|from| {
                Value::subquery(
                    Selection::of(vec![scope.stage.field(from)])
                        .from(scope.stage.clone())
                        .filter(changed.clone()),
                )
            }),
            condition: Some(Condition::exists(
                scope.stage_rows().filter(changed.clone()),
            )),
        });

        let known = Condition::exists(scope.sink_rows().filter(Condition::and(vec![
            self.keys_match(),
            self.digest_matches(),
        ])))
        .negate();
        let mut new_rows: Vec<Condition> = split.into_iter().collect();
        new_rows.push(known);
        let insert = self.insert_columns().insert(
            &self.main.reference,
            scope.stage.clone(),
            Some(Condition::and(new_rows)),
        );

        let mut operations = vec![update, insert];
        if let Some(deleted) = self.deleted_rows(true) {
            operations.push(Operation::Delete(Delete {
                dataset: scope.sink.clone(),
                condition: Some(deleted),
            }));
        }
        operations
    }
}

impl Planner for NontemporalDeltaPlanner<'_> {
    fn main(&self) -> &DatasetDefinition {
        &self.main
    }

    fn bookkeeping_fields(&self) -> Vec<String> {
        self.config
            .auditing
            .field()
            .map(str::to_string)
            .into_iter()
            .collect()
    }

    fn column_mapping(&self) -> Vec<(String, String)> {
        self.scope.identity_mapping()
    }

    fn ingest(&self) -> PlannerResult<Vec<Operation>> {
        if self.scope.capabilities.contains(Capability::Merge) {
            Ok(vec![self.merge()])
        } else {
            Ok(self.update_insert_delete())
        }
    }

    fn pre_ingest_statistics(&self) -> Vec<(StatisticName, Selection)> {
        self.deleted_rows(false)
            .map(|deleted| {
                statistics::count(
                    StatisticName::RowsDeleted,
                    self.scope.sink.clone(),
                    Some(deleted),
                )
            })
            .into_iter()
            .collect()
    }

    fn post_ingest_statistics(&self) -> Vec<(StatisticName, Selection)> {
        let scope = &self.scope;
        let mut stats = vec![
            statistics::count(
                StatisticName::IncomingRecordCount,
                scope.stage.clone(),
                scope.data_split_condition(),
            ),
            statistics::zero(StatisticName::RowsTerminated),
        ];
        if scope.delete_indicator.is_none() {
            stats.push(statistics::zero(StatisticName::RowsDeleted));
        }
        stats
    }
}
