//! Overwrite (nontemporal snapshot): main is emptied and reloaded from staging.

use crate::ingest_mode::Overwrite;
use crate::logical::{DatasetDefinition, Delete, Operation, Selection, Value};

use super::common::{audit_field, ensure_field, InsertColumns, PlanScope};
use super::statistics::{self, StatisticName};
use super::{Planner, PlannerResult};

pub struct OverwritePlanner<'a> {
    scope: PlanScope<'a>,
    config: &'a Overwrite,
    main: DatasetDefinition,
}

impl<'a> OverwritePlanner<'a> {
    pub fn new(scope: PlanScope<'a>, config: &'a Overwrite) -> PlannerResult<Self> {
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
        })
    }
}

impl Planner for OverwritePlanner<'_> {
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
        let scope = &self.scope;
        let mut columns = InsertColumns::mapped(&self.column_mapping(), &scope.stage);
        if let Some(audit) = self.config.auditing.field() {
            columns.push(audit, Value::BatchStartTimestamp);
        }
        Ok(vec![
            Operation::Delete(Delete {
                dataset: scope.sink.clone(),
                condition: None,
            }),
            columns.insert(&self.main.reference, scope.stage.clone(), None),
        ])
    }

    fn pre_ingest_statistics(&self) -> Vec<(StatisticName, Selection)> {
        vec![statistics::count(
            StatisticName::RowsDeleted,
            self.scope.sink.clone(),
            None,
        )]
    }

    fn post_ingest_statistics(&self) -> Vec<(StatisticName, Selection)> {
        let scope = &self.scope;
        vec![
            statistics::count(StatisticName::IncomingRecordCount, scope.stage.clone(), None),
            statistics::count(StatisticName::RowsInserted, scope.sink.clone(), None),
            statistics::zero(StatisticName::RowsUpdated),
            statistics::zero(StatisticName::RowsTerminated),
        ]
    }
}
