//! Unitemporal planners: history kept in transaction time.
//!
//! A batch first closes the open version of every changed key (milestone),
//! then inserts the new versions as open rows (upsert). Rows are open while
//! `batch_id_out` holds the infinite batch id, or `batch_time_out` holds
//! `9999-12-31 23:59:59` for datetime-only milestoning.
//!
//! The delta planner also drives bitemporal ingestion, where the validity
//! interval from staging becomes part of the row identity.

use crate::ingest_mode::{TransactionMilestoning, UnitemporalDelta, UnitemporalSnapshot};
use crate::logical::{
    Condition, DataType, DatasetDefinition, DatasetReference, Field, Operation, Selection, Update,
    Value,
};

use super::common::{ensure_field, InsertColumns, PlanScope, MAX_DATETIME, SINK_SUCCESSOR};
use super::statistics::{self, StatisticName};
use super::{Planner, PlannerError, PlannerResult};

/// Transaction-time columns and the conditions built on them.
pub(crate) struct TransactionTime<'m> {
    milestoning: &'m TransactionMilestoning,
    batch_id: Value,
    infinite_batch_id: Value,
}

impl<'m> TransactionTime<'m> {
    pub(crate) fn new(milestoning: &'m TransactionMilestoning, scope: &PlanScope<'_>) -> Self {
        Self {
            milestoning,
            batch_id: scope.batch_id(),
            infinite_batch_id: scope.infinite_batch_id(),
        }
    }

    fn previous_batch_id(&self) -> Value {
        self.batch_id.clone().minus(Value::Integer(1))
    }

    pub(crate) fn field_names(&self) -> Vec<String> {
        self.milestoning
            .fields()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Columns appended to main when it lacks them.
    pub(crate) fn enrich(&self, fields: &mut Vec<Field>) {
        let time_is_key = self.milestoning.batch_id().is_none();
        if let Some((batch_in, batch_out)) = self.milestoning.batch_id() {
            ensure_field(fields, Field::new(batch_in, DataType::Integer).primary_key());
            ensure_field(fields, Field::new(batch_out, DataType::Integer));
        }
        if let Some((time_in, time_out)) = self.milestoning.date_time_fields() {
            let time_in = Field::new(time_in, DataType::Datetime);
            ensure_field(
                fields,
                if time_is_key {
                    time_in.primary_key()
                } else {
                    time_in
                },
            );
            ensure_field(fields, Field::new(time_out, DataType::Datetime));
        }
    }

    /// Rows of `on` still open.
    pub(crate) fn open(&self, on: &DatasetReference) -> Condition {
        match (self.milestoning.batch_id(), self.milestoning.date_time_fields()) {
            (Some((_, batch_out)), _) => on
                .field(batch_out)
                .equals(self.infinite_batch_id.clone()),
            (None, Some((_, time_out))) => on
                .field(time_out)
                .equals(Value::DateTime(MAX_DATETIME.to_string())),
            (None, None) => Condition::and(Vec::new()),
        }
    }

    /// Rows of `on` closed by this batch.
    pub(crate) fn closed_now(&self, on: &DatasetReference) -> Condition {
        match (self.milestoning.batch_id(), self.milestoning.date_time_fields()) {
            (Some((_, batch_out)), _) => on.field(batch_out).equals(self.previous_batch_id()),
            (None, Some((_, time_out))) => on.field(time_out).equals(Value::BatchStartTimestamp),
            (None, None) => Condition::and(Vec::new()),
        }
    }

    /// Rows of `on` opened by this batch.
    pub(crate) fn opened_now(&self, on: &DatasetReference) -> Condition {
        match (self.milestoning.batch_id(), self.milestoning.date_time_fields()) {
            (Some((batch_in, _)), _) => on.field(batch_in).equals(self.batch_id.clone()),
            (None, Some((time_in, _))) => on.field(time_in).equals(Value::BatchStartTimestamp),
            (None, None) => Condition::and(Vec::new()),
        }
    }

    /// `SET out = <closing value>` for each out column.
    pub(crate) fn close(&self, on: &DatasetReference) -> Vec<(Value, Value)> {
        let mut assignments = Vec::new();
        if let Some((_, batch_out)) = self.milestoning.batch_id() {
            assignments.push((on.field(batch_out), self.previous_batch_id()));
        }
        if let Some((_, time_out)) = self.milestoning.date_time_fields() {
            assignments.push((on.field(time_out), Value::BatchStartTimestamp));
        }
        assignments
    }

    /// In and out values of a freshly opened row.
    pub(crate) fn open_columns(&self, columns: &mut InsertColumns) {
        if let Some((batch_in, batch_out)) = self.milestoning.batch_id() {
            columns
                .push(batch_in, self.batch_id.clone())
                .push(batch_out, self.infinite_batch_id.clone());
        }
        if let Some((time_in, time_out)) = self.milestoning.date_time_fields() {
            columns
                .push(time_in, Value::BatchStartTimestamp)
                .push(time_out, Value::DateTime(MAX_DATETIME.to_string()));
        }
    }
}

/// Business validity columns of a bitemporal main table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Validity {
    pub from: String,
    pub through: String,
    pub source_from: String,
    pub source_through: String,
}

/// Milestone + upsert over keys, optionally extended by a validity interval.
pub struct UnitemporalDeltaPlanner<'a> {
    scope: PlanScope<'a>,
    digest: &'a str,
    time: TransactionTime<'a>,
    validity: Option<Validity>,
    keys: Vec<String>,
    mapping: Vec<(String, String)>,
    main: DatasetDefinition,
}

impl<'a> UnitemporalDeltaPlanner<'a> {
    pub fn new(scope: PlanScope<'a>, config: &'a UnitemporalDelta) -> PlannerResult<Self> {
        Self::build(
            scope,
            &config.digest_field,
            &config.transaction_milestoning,
            None,
        )
    }

    pub(crate) fn build(
        scope: PlanScope<'a>,
        digest: &'a str,
        milestoning: &'a TransactionMilestoning,
        validity: Option<Validity>,
    ) -> PlannerResult<Self> {
        let mut keys = scope.require_keys()?;
        scope.require_staging_field(digest)?;
        if let Some(validity) = &validity {
            keys.retain(|k| *k != validity.source_from && *k != validity.source_through);
            if keys.is_empty() {
                return Err(PlannerError::invalid(
                    "primary_keys",
                    "bitemporal main needs a primary key besides the validity interval",
                ));
            }
        }

        let mut mapping = scope.identity_mapping();
        if let Some(validity) = &validity {
            scope.require_staging_field(&validity.source_from)?;
            scope.require_staging_field(&validity.source_through)?;
            for (from, to) in mapping.iter_mut() {
                if *from == validity.source_from {
                    *to = validity.from.clone();
                } else if *from == validity.source_through {
                    *to = validity.through.clone();
                }
            }
        }

        let mut fields: Vec<Field> = scope
            .main
            .schema
            .fields
            .iter()
            .map(|f| match mapping.iter().find(|(from, to)| from == &f.name && to != from) {
                Some((_, to)) => f.with_name(to),
                None => f.clone(),
            })
            .collect();
        let time = TransactionTime::new(milestoning, &scope);
        time.enrich(&mut fields);
        if let Some(validity) = &validity {
            ensure_field(
                &mut fields,
                Field::new(&validity.from, DataType::Datetime).primary_key(),
            );
            ensure_field(&mut fields, Field::new(&validity.through, DataType::Datetime));
        }
        let main = scope.main.with_fields(fields);

        let planner = Self {
            scope: PlanScope {
                main: main.clone(),
                ..scope
            },
            digest,
            time,
            validity,
            keys,
            mapping,
            main,
        };
        planner.scope.check_primary_keys(&planner.mapping)?;
        Ok(planner)
    }

    fn keys_match(&self, left: &DatasetReference, right: &DatasetReference) -> Condition {
        Condition::and(
            self.keys
                .iter()
                .map(|k| left.field(k).equals(right.field(k)))
                .collect(),
        )
    }

    /// `sink.validity_from = stage.<source from>`
    fn validity_match(&self) -> Option<Condition> {
        self.validity.as_ref().map(|v| {
            self.scope
                .sink
                .field(&v.from)
                .equals(self.scope.stage.field(&v.source_from))
        })
    }

    /// Keys plus both validity ends equal between sink and stage.
    fn interval_match(&self) -> Condition {
        let scope = &self.scope;
        let mut same = vec![self.keys_match(&scope.sink, &scope.stage)];
        if let Some(v) = &self.validity {
            same.push(scope.sink.field(&v.from).equals(scope.stage.field(&v.source_from)));
            same.push(
                scope
                    .sink
                    .field(&v.through)
                    .equals(scope.stage.field(&v.source_through)),
            );
        }
        Condition::and(same)
    }

    /// Snapshot ingestion: close open rows missing from staging, then insert
    /// staging rows whose digest is not open.
    pub(crate) fn snapshot_ingest(&self) -> Vec<Operation> {
        let scope = &self.scope;
        let same = Condition::and(vec![
            self.interval_match(),
            scope
                .sink
                .field(self.digest)
                .equals(scope.stage.field(self.digest)),
        ]);
        let milestone = Operation::Update(Update {
            dataset: scope.sink.clone(),
            assignments: self.time.close(&scope.sink),
            condition: Some(Condition::and(vec![
                self.time.open(&scope.sink),
                Condition::exists(scope.stage_rows().filter(same)).negate(),
            ])),
        });

        let open_digests = Selection::of(vec![scope.sink.field(self.digest)])
            .from(scope.sink.clone())
            .filter(self.time.open(&scope.sink));
        let mut columns = InsertColumns::mapped(&self.mapping, &scope.stage);
        self.time.open_columns(&mut columns);
        let upsert = columns.insert(
            &self.main.reference,
            scope.stage.clone(),
            Some(
                scope
                    .stage
                    .field(self.digest)
                    .in_selection(open_digests)
                    .negate(),
            ),
        );
        vec![milestone, upsert]
    }

    /// Snapshot statistics always count terminations.
    pub(crate) fn snapshot_statistics(&self) -> Vec<(StatisticName, Selection)> {
        let validity = self.validity.as_ref().map(|v| v.from.as_str());
        transaction_statistics(&self.scope, &self.time, &self.keys, validity, true)
    }

    fn milestone(&self) -> Operation {
        let scope = &self.scope;
        let digest_differs = scope
            .sink
            .field(self.digest)
            .not_equals(scope.stage.field(self.digest));
        let change = match &scope.delete_indicator {
            Some(indicator) => Condition::or(vec![digest_differs, indicator.deleted(&scope.stage)]),
            None => digest_differs,
        };

        let mut matched: Vec<Condition> = scope.data_split_condition().into_iter().collect();
        matched.push(self.keys_match(&scope.sink, &scope.stage));
        matched.extend(self.validity_match());
        matched.push(change);

        Operation::Update(Update {
            dataset: scope.sink.clone(),
            assignments: self.time.close(&scope.sink),
            condition: Some(Condition::and(vec![
                self.time.open(&scope.sink),
                Condition::exists(scope.stage_rows().filter(Condition::and(matched))),
            ])),
        })
    }

    fn upsert(&self) -> Operation {
        let scope = &self.scope;
        let mut current = vec![
            self.time.open(&scope.sink),
            scope
                .sink
                .field(self.digest)
                .equals(scope.stage.field(self.digest)),
            self.keys_match(&scope.sink, &scope.stage),
        ];
        current.extend(self.validity_match());
        let unchanged = Condition::exists(scope.sink_rows().filter(Condition::and(current)));

        let mut conditions: Vec<Condition> = scope.data_split_condition().into_iter().collect();
        conditions.push(unchanged.negate());
        if let Some(indicator) = &scope.delete_indicator {
            conditions.push(indicator.kept(&scope.stage));
        }

        let mut columns = InsertColumns::mapped(&self.mapping, &scope.stage);
        self.time.open_columns(&mut columns);
        columns.insert(
            &self.main.reference,
            scope.stage.clone(),
            Some(Condition::and(conditions)),
        )
    }
}

impl Planner for UnitemporalDeltaPlanner<'_> {
    fn main(&self) -> &DatasetDefinition {
        &self.main
    }

    fn bookkeeping_fields(&self) -> Vec<String> {
        self.time.field_names()
    }

    fn column_mapping(&self) -> Vec<(String, String)> {
        self.mapping.clone()
    }

    fn ingest(&self) -> PlannerResult<Vec<Operation>> {
        Ok(vec![self.milestone(), self.upsert()])
    }

    fn post_ingest_statistics(&self) -> Vec<(StatisticName, Selection)> {
        let terminating = self.scope.delete_indicator.is_some();
        let validity = self.validity.as_ref().map(|v| v.from.as_str());
        transaction_statistics(&self.scope, &self.time, &self.keys, validity, terminating)
    }
}

/// Snapshot: staging holds the complete current state of main.
pub struct UnitemporalSnapshotPlanner<'a> {
    scope: PlanScope<'a>,
    config: &'a UnitemporalSnapshot,
    time: TransactionTime<'a>,
    keys: Vec<String>,
    main: DatasetDefinition,
}

impl<'a> UnitemporalSnapshotPlanner<'a> {
    pub fn new(scope: PlanScope<'a>, config: &'a UnitemporalSnapshot) -> PlannerResult<Self> {
        let keys = scope.require_keys()?;
        scope.require_staging_field(&config.digest_field)?;
        scope.check_primary_keys(&scope.identity_mapping())?;

        let mut fields = scope.main.schema.fields.clone();
        let time = TransactionTime::new(&config.transaction_milestoning, &scope);
        time.enrich(&mut fields);
        let main = scope.main.with_fields(fields);
        Ok(Self {
            scope,
            config,
            time,
            keys,
            main,
        })
    }
}

impl Planner for UnitemporalSnapshotPlanner<'_> {
    fn main(&self) -> &DatasetDefinition {
        &self.main
    }

    fn bookkeeping_fields(&self) -> Vec<String> {
        self.time.field_names()
    }

    fn column_mapping(&self) -> Vec<(String, String)> {
        self.scope.identity_mapping()
    }

    fn ingest(&self) -> PlannerResult<Vec<Operation>> {
        let scope = &self.scope;
        let digest = &self.config.digest_field;

        // Open rows with no identical staging row are closed.
        let mut same = Vec::new();
        same.extend(scope.keys_match(&self.keys, &scope.sink, &scope.stage));
        same.push(scope.sink.field(digest).equals(scope.stage.field(digest)));
        let milestone = Operation::Update(Update {
            dataset: scope.sink.clone(),
            assignments: self.time.close(&scope.sink),
            condition: Some(Condition::and(vec![
                self.time.open(&scope.sink),
                Condition::exists(scope.stage_rows().filter(Condition::and(same))).negate(),
            ])),
        });

        // Staging rows whose digest is not open in main are inserted.
        let open_digests = Selection::of(vec![scope.sink.field(digest)])
            .from(scope.sink.clone())
            .filter(self.time.open(&scope.sink));
        let mut columns = InsertColumns::mapped(&self.column_mapping(), &scope.stage);
        self.time.open_columns(&mut columns);
        let upsert = columns.insert(
            &self.main.reference,
            scope.stage.clone(),
            Some(
                scope
                    .stage
                    .field(digest)
                    .in_selection(open_digests)
                    .negate(),
            ),
        );

        Ok(vec![milestone, upsert])
    }

    fn post_ingest_statistics(&self) -> Vec<(StatisticName, Selection)> {
        transaction_statistics(&self.scope, &self.time, &self.keys, None, true)
    }
}

/// Statistics of transaction-time milestoning.
///
/// A closed row with an open successor of the same key was updated; a
/// closed row without one was terminated.
pub(crate) fn transaction_statistics(
    scope: &PlanScope<'_>,
    time: &TransactionTime<'_>,
    keys: &[String],
    validity_from: Option<&str>,
    terminating: bool,
) -> Vec<(StatisticName, Selection)> {
    let sink = &scope.sink;
    let incoming = statistics::count(
        StatisticName::IncomingRecordCount,
        scope.stage.clone(),
        scope.data_split_condition(),
    );
    let opened = || statistics::count_of(sink.clone(), Some(time.opened_now(sink)));
    let closed = || statistics::count_of(sink.clone(), Some(time.closed_now(sink)));

    if !terminating {
        return vec![
            incoming,
            statistics::count(
                StatisticName::RowsUpdated,
                sink.clone(),
                Some(time.closed_now(sink)),
            ),
            statistics::difference(StatisticName::RowsInserted, opened(), closed()),
            statistics::zero(StatisticName::RowsDeleted),
            statistics::zero(StatisticName::RowsTerminated),
        ];
    }

    let successor = sink.with_alias(SINK_SUCCESSOR);
    let mut same_row: Vec<Condition> = keys
        .iter()
        .map(|k| successor.field(k).equals(sink.field(k)))
        .collect();
    if let Some(from) = validity_from {
        same_row.push(successor.field(from).equals(sink.field(from)));
    }
    let has_successor = Condition::exists(Selection::all_from(successor.clone()).filter(
        Condition::and(vec![Condition::and(same_row), time.opened_now(&successor)]),
    ));
    let updated = Condition::and(vec![time.closed_now(sink), has_successor]);
    let updated_rows = || statistics::count_of(sink.clone(), Some(updated.clone()));

    let deleted = if scope.delete_indicator.is_some() {
        statistics::difference(StatisticName::RowsDeleted, closed(), updated_rows())
    } else {
        statistics::zero(StatisticName::RowsDeleted)
    };
    vec![
        incoming,
        statistics::count(StatisticName::RowsUpdated, sink.clone(), Some(updated.clone())),
        statistics::difference(StatisticName::RowsInserted, opened(), updated_rows()),
        deleted,
        statistics::difference(StatisticName::RowsTerminated, closed(), updated_rows()),
    ]
}
