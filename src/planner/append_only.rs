//! Append-only: every staging row becomes a new main row.

use crate::ingest_mode::AppendOnly;
use crate::logical::{Condition, DataType, DatasetDefinition, Field, Operation, Selection, Value};

use super::common::{audit_field, ensure_field, has_primary_key, InsertColumns, PlanScope};
use super::statistics::{self, StatisticName};
use super::{Planner, PlannerResult};

pub struct AppendOnlyPlanner<'a> {
    scope: PlanScope<'a>,
    config: &'a AppendOnly,
    main: DatasetDefinition,
}

impl<'a> AppendOnlyPlanner<'a> {
    pub fn new(scope: PlanScope<'a>, config: &'a AppendOnly) -> PlannerResult<Self> {
        if config.filter_existing_records {
            if let Some(digest) = &config.digest_field {
                scope.require_staging_field(digest)?;
            }
        }
        scope.check_primary_keys(&scope.identity_mapping())?;

        let mut fields = scope.main.schema.fields.clone();
        let keyed = has_primary_key(&fields);
        if let Some(audit) = config.auditing.field() {
            ensure_field(&mut fields, audit_field(audit, keyed).not_null());
        }
        ensure_field(
            &mut fields,
            Field::new(&config.batch_id_field, DataType::Integer),
        );
        let main = scope.main.with_fields(fields);
        Ok(Self {
            scope,
            config,
            main,
        })
    }

    /// Rows of staging already in main with the same key and digest.
    fn already_loaded(&self, digest: &str) -> Condition {
        let scope = &self.scope;
        let keys = scope.key_fields();
        let mut matched: Vec<Condition> = scope
            .keys_match(&keys, &scope.sink, &scope.stage)
            .into_iter()
            .collect();
        matched.push(scope.sink.field(digest).equals(scope.stage.field(digest)));
        Condition::exists(scope.sink_rows().filter(Condition::and(matched)))
    }
}

impl Planner for AppendOnlyPlanner<'_> {
    fn main(&self) -> &DatasetDefinition {
        &self.main
    }

    fn bookkeeping_fields(&self) -> Vec<String> {
        let audit = self.config.auditing.field().map(str::to_string);
        audit
            .into_iter()
            .chain([self.config.batch_id_field.clone()])
            .collect()
    }

    fn column_mapping(&self) -> Vec<(String, String)> {
        self.scope.identity_mapping()
    }

    fn ingest(&self) -> PlannerResult<Vec<Operation>> {
        let scope = &self.scope;
        let mut columns = InsertColumns::mapped(&self.column_mapping(), &scope.stage);
        if let Some(audit) = self.config.auditing.field() {
            columns.push(audit, Value::BatchStartTimestamp);
        }
        columns.push(&self.config.batch_id_field, scope.batch_id());

        let mut conditions: Vec<Condition> = scope.data_split_condition().into_iter().collect();
        if self.config.filter_existing_records {
            if let Some(digest) = &self.config.digest_field {
                conditions.push(self.already_loaded(digest).negate());
            }
        }
        let condition = (!conditions.is_empty()).then(|| Condition::and(conditions));
        Ok(vec![columns.insert(
            &self.main.reference,
            scope.stage.clone(),
            condition,
        )])
    }

    fn post_ingest_statistics(&self) -> Vec<(StatisticName, Selection)> {
        let scope = &self.scope;
        vec![
            statistics::count(
                StatisticName::IncomingRecordCount,
                scope.stage.clone(),
                scope.data_split_condition(),
            ),
            statistics::count(
                StatisticName::RowsInserted,
                scope.sink.clone(),
                Some(
                    scope
                        .sink
                        .field(&self.config.batch_id_field)
                        .equals(scope.batch_id()),
                ),
            ),
            statistics::zero(StatisticName::RowsUpdated),
            statistics::zero(StatisticName::RowsDeleted),
            statistics::zero(StatisticName::RowsTerminated),
        ]
    }
}
