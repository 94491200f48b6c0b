//! Ingest modes.
//!
//! An [`IngestMode`] says how staged rows are merged into the main table. It
//! is a closed sum type: every planner dispatch matches on it exhaustively,
//! so a new mode cannot be added without touching every place that cares.
//!
//! ```toml
//! [ingest_mode]
//! mode = "unitemporal_delta"
//! digest_field = "digest"
//! data_split_field = "data_split"
//!
//! [ingest_mode.transaction_milestoning]
//! kind = "batch_id"
//! batch_id_in = "batch_id_in"
//! batch_id_out = "batch_id_out"
//!
//! [ingest_mode.merge_strategy]
//! kind = "delete_indicator"
//! field = "delete_indicator"
//! values = ["yes", "1", "true"]
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::planner::{PlannerError, PlannerResult};

fn default_digest() -> String {
    "digest".to_string()
}

fn default_batch_id() -> String {
    "batch_id".to_string()
}

fn default_batch_id_in() -> String {
    "batch_id_in".to_string()
}

fn default_batch_id_out() -> String {
    "batch_id_out".to_string()
}

fn default_batch_time_in() -> String {
    "batch_time_in".to_string()
}

fn default_batch_time_out() -> String {
    "batch_time_out".to_string()
}

fn default_audit_field() -> String {
    "batch_update_time".to_string()
}

fn default_delete_indicator() -> String {
    "delete_indicator".to_string()
}

fn default_validity_from() -> String {
    "validity_from_target".to_string()
}

fn default_validity_through() -> String {
    "validity_through_target".to_string()
}

fn default_source_from() -> String {
    "validity_from_reference".to_string()
}

fn default_source_through() -> String {
    "validity_through_reference".to_string()
}

/// Whether rows written by a batch are stamped with the batch start time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Auditing {
    #[default]
    None,
    DateTime {
        #[serde(default = "default_audit_field")]
        field: String,
    },
}

impl Auditing {
    pub fn date_time(field: impl Into<String>) -> Self {
        Auditing::DateTime {
            field: field.into(),
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            Auditing::None => None,
            Auditing::DateTime { field } => Some(field),
        }
    }
}

/// How row versions are stamped in processing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionMilestoning {
    BatchId {
        #[serde(default = "default_batch_id_in")]
        batch_id_in: String,
        #[serde(default = "default_batch_id_out")]
        batch_id_out: String,
    },
    DateTime {
        #[serde(default = "default_batch_time_in")]
        date_time_in: String,
        #[serde(default = "default_batch_time_out")]
        date_time_out: String,
    },
    BatchIdAndDateTime {
        #[serde(default = "default_batch_id_in")]
        batch_id_in: String,
        #[serde(default = "default_batch_id_out")]
        batch_id_out: String,
        #[serde(default = "default_batch_time_in")]
        date_time_in: String,
        #[serde(default = "default_batch_time_out")]
        date_time_out: String,
    },
}

impl Default for TransactionMilestoning {
    fn default() -> Self {
        TransactionMilestoning::BatchId {
            batch_id_in: default_batch_id_in(),
            batch_id_out: default_batch_id_out(),
        }
    }
}

impl TransactionMilestoning {
    pub fn date_time() -> Self {
        TransactionMilestoning::DateTime {
            date_time_in: default_batch_time_in(),
            date_time_out: default_batch_time_out(),
        }
    }

    pub fn batch_id_and_date_time() -> Self {
        TransactionMilestoning::BatchIdAndDateTime {
            batch_id_in: default_batch_id_in(),
            batch_id_out: default_batch_id_out(),
            date_time_in: default_batch_time_in(),
            date_time_out: default_batch_time_out(),
        }
    }

    /// `(in, out)` batch id columns.
    pub fn batch_id(&self) -> Option<(&str, &str)> {
        match self {
            TransactionMilestoning::BatchId {
                batch_id_in,
                batch_id_out,
            }
            | TransactionMilestoning::BatchIdAndDateTime {
                batch_id_in,
                batch_id_out,
                ..
            } => Some((batch_id_in, batch_id_out)),
            TransactionMilestoning::DateTime { .. } => None,
        }
    }

    /// `(in, out)` batch time columns.
    pub fn date_time_fields(&self) -> Option<(&str, &str)> {
        match self {
            TransactionMilestoning::DateTime {
                date_time_in,
                date_time_out,
            }
            | TransactionMilestoning::BatchIdAndDateTime {
                date_time_in,
                date_time_out,
                ..
            } => Some((date_time_in, date_time_out)),
            TransactionMilestoning::BatchId { .. } => None,
        }
    }

    /// All milestoning columns, in table order.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        if let Some((batch_in, batch_out)) = self.batch_id() {
            fields.extend([batch_in, batch_out]);
        }
        if let Some((time_in, time_out)) = self.date_time_fields() {
            fields.extend([time_in, time_out]);
        }
        fields
    }

    fn validate(&self) -> PlannerResult<()> {
        let fields = self.fields();
        for (i, field) in fields.iter().enumerate() {
            if field.is_empty() {
                return Err(PlannerError::invalid(
                    "transaction_milestoning",
                    "milestoning field names must not be empty",
                ));
            }
            if fields[..i].contains(field) {
                return Err(PlannerError::invalid(
                    "transaction_milestoning",
                    format!("field '{}' is used for more than one milestone", field),
                ));
            }
        }
        Ok(())
    }
}

/// Where the business validity interval of a row comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidityMilestoning {
    /// Staging rows carry both ends of the interval.
    SourceSpecifiesFromAndThrough {
        #[serde(default = "default_validity_from")]
        from_field: String,
        #[serde(default = "default_validity_through")]
        through_field: String,
        #[serde(default = "default_source_from")]
        source_from_field: String,
        #[serde(default = "default_source_through")]
        source_through_field: String,
    },
}

impl Default for ValidityMilestoning {
    fn default() -> Self {
        ValidityMilestoning::SourceSpecifiesFromAndThrough {
            from_field: default_validity_from(),
            through_field: default_validity_through(),
            source_from_field: default_source_from(),
            source_through_field: default_source_through(),
        }
    }
}

impl ValidityMilestoning {
    fn validate(&self) -> PlannerResult<()> {
        let ValidityMilestoning::SourceSpecifiesFromAndThrough {
            from_field,
            through_field,
            ..
        } = self;
        if from_field == through_field {
            return Err(PlannerError::invalid(
                "validity_milestoning",
                "validity from and through fields must differ",
            ));
        }
        Ok(())
    }
}

/// How deletions in staging are signalled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergeStrategy {
    #[default]
    NoDeletes,
    /// Rows whose `field` holds one of `values` are deletions.
    DeleteIndicator {
        #[serde(default = "default_delete_indicator")]
        field: String,
        values: Vec<String>,
    },
}

impl MergeStrategy {
    pub fn delete_indicator(field: impl Into<String>, values: &[&str]) -> Self {
        MergeStrategy::DeleteIndicator {
            field: field.into(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    fn validate(&self) -> PlannerResult<()> {
        match self {
            MergeStrategy::NoDeletes => Ok(()),
            MergeStrategy::DeleteIndicator { field, .. } if field.is_empty() => Err(
                PlannerError::invalid("merge_strategy.field", "delete indicator field is empty"),
            ),
            MergeStrategy::DeleteIndicator { values, .. } if values.is_empty() => {
                Err(PlannerError::invalid(
                    "merge_strategy.values",
                    "delete indicator needs at least one value",
                ))
            }
            MergeStrategy::DeleteIndicator { .. } => Ok(()),
        }
    }
}

/// Digest computation for bulk loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DigestGeneration {
    #[default]
    None,
    /// `<udf_name>(OBJECT_CONSTRUCT('col', value, ...))` into `field`.
    UdfBased {
        udf_name: String,
        #[serde(default = "default_digest")]
        field: String,
    },
}

/// One inclusive range of the data split column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSplitRange {
    pub lower: i64,
    pub upper: i64,
}

impl DataSplitRange {
    pub fn new(lower: i64, upper: i64) -> Self {
        Self { lower, upper }
    }
}

impl fmt::Display for DataSplitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppendOnly {
    pub digest_field: Option<String>,
    pub auditing: Auditing,
    /// Skip staging rows already present in main with the same key and digest.
    pub filter_existing_records: bool,
    pub batch_id_field: String,
    pub data_split_field: Option<String>,
}

impl Default for AppendOnly {
    fn default() -> Self {
        Self {
            digest_field: Some(default_digest()),
            auditing: Auditing::None,
            filter_existing_records: false,
            batch_id_field: default_batch_id(),
            data_split_field: None,
        }
    }
}

/// Replace the whole main table with the staging rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overwrite {
    pub auditing: Auditing,
}

/// Upsert without history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NontemporalDelta {
    pub digest_field: String,
    pub auditing: Auditing,
    pub merge_strategy: MergeStrategy,
    pub data_split_field: Option<String>,
}

impl Default for NontemporalDelta {
    fn default() -> Self {
        Self {
            digest_field: default_digest(),
            auditing: Auditing::None,
            merge_strategy: MergeStrategy::NoDeletes,
            data_split_field: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitemporalDelta {
    pub digest_field: String,
    pub transaction_milestoning: TransactionMilestoning,
    pub merge_strategy: MergeStrategy,
    pub data_split_field: Option<String>,
}

impl Default for UnitemporalDelta {
    fn default() -> Self {
        Self {
            digest_field: default_digest(),
            transaction_milestoning: TransactionMilestoning::default(),
            merge_strategy: MergeStrategy::NoDeletes,
            data_split_field: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitemporalSnapshot {
    pub digest_field: String,
    pub transaction_milestoning: TransactionMilestoning,
}

impl Default for UnitemporalSnapshot {
    fn default() -> Self {
        Self {
            digest_field: default_digest(),
            transaction_milestoning: TransactionMilestoning::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BitemporalDelta {
    pub digest_field: String,
    pub transaction_milestoning: TransactionMilestoning,
    pub validity_milestoning: ValidityMilestoning,
    pub merge_strategy: MergeStrategy,
    pub data_split_field: Option<String>,
}

impl Default for BitemporalDelta {
    fn default() -> Self {
        Self {
            digest_field: default_digest(),
            transaction_milestoning: TransactionMilestoning::default(),
            validity_milestoning: ValidityMilestoning::default(),
            merge_strategy: MergeStrategy::NoDeletes,
            data_split_field: None,
        }
    }
}

/// Bitemporal snapshot: staging holds every current validity interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BitemporalSnapshot {
    pub digest_field: String,
    pub transaction_milestoning: TransactionMilestoning,
    pub validity_milestoning: ValidityMilestoning,
}

impl Default for BitemporalSnapshot {
    fn default() -> Self {
        Self {
            digest_field: default_digest(),
            transaction_milestoning: TransactionMilestoning::default(),
            validity_milestoning: ValidityMilestoning::default(),
        }
    }
}

/// `COPY` staged files straight into main.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkLoad {
    pub digest_generation: DigestGeneration,
    pub auditing: Auditing,
    pub batch_id_field: String,
    /// Add `file_name` / `row_number` lineage columns.
    pub lineage: bool,
}

impl Default for BulkLoad {
    fn default() -> Self {
        Self {
            digest_generation: DigestGeneration::None,
            auditing: Auditing::None,
            batch_id_field: default_batch_id(),
            lineage: false,
        }
    }
}

/// The ingest strategy of one generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum IngestMode {
    AppendOnly(AppendOnly),
    /// Also known as nontemporal snapshot.
    #[serde(alias = "nontemporal_snapshot")]
    Overwrite(Overwrite),
    NontemporalDelta(NontemporalDelta),
    UnitemporalDelta(UnitemporalDelta),
    UnitemporalSnapshot(UnitemporalSnapshot),
    BitemporalDelta(BitemporalDelta),
    BitemporalSnapshot(BitemporalSnapshot),
    BulkLoad(BulkLoad),
}

impl IngestMode {
    pub fn name(&self) -> &'static str {
        match self {
            IngestMode::AppendOnly(_) => "append_only",
            IngestMode::Overwrite(_) => "overwrite",
            IngestMode::NontemporalDelta(_) => "nontemporal_delta",
            IngestMode::UnitemporalDelta(_) => "unitemporal_delta",
            IngestMode::UnitemporalSnapshot(_) => "unitemporal_snapshot",
            IngestMode::BitemporalDelta(_) => "bitemporal_delta",
            IngestMode::BitemporalSnapshot(_) => "bitemporal_snapshot",
            IngestMode::BulkLoad(_) => "bulk_load",
        }
    }

    /// The staging column ranges are taken over, when the mode splits.
    pub fn data_split_field(&self) -> Option<&str> {
        match self {
            IngestMode::AppendOnly(mode) => mode.data_split_field.as_deref(),
            IngestMode::NontemporalDelta(mode) => mode.data_split_field.as_deref(),
            IngestMode::UnitemporalDelta(mode) => mode.data_split_field.as_deref(),
            IngestMode::BitemporalDelta(mode) => mode.data_split_field.as_deref(),
            IngestMode::Overwrite(_)
            | IngestMode::UnitemporalSnapshot(_)
            | IngestMode::BitemporalSnapshot(_)
            | IngestMode::BulkLoad(_) => None,
        }
    }

    pub fn merge_strategy(&self) -> &MergeStrategy {
        static NO_DELETES: MergeStrategy = MergeStrategy::NoDeletes;
        match self {
            IngestMode::NontemporalDelta(mode) => &mode.merge_strategy,
            IngestMode::UnitemporalDelta(mode) => &mode.merge_strategy,
            IngestMode::BitemporalDelta(mode) => &mode.merge_strategy,
            _ => &NO_DELETES,
        }
    }

    /// Structural checks that do not need the datasets.
    pub fn validate(&self) -> PlannerResult<()> {
        if let Some(field) = self.data_split_field() {
            if field.is_empty() {
                return Err(PlannerError::invalid(
                    "data_split_field",
                    "data split field name is empty",
                ));
            }
        }
        self.merge_strategy().validate()?;
        match self {
            IngestMode::AppendOnly(mode) => {
                if mode.filter_existing_records && mode.digest_field.is_none() {
                    return Err(PlannerError::invalid(
                        "filter_existing_records",
                        "filtering existing records needs a digest field",
                    ));
                }
                if mode.batch_id_field.is_empty() {
                    return Err(PlannerError::invalid("batch_id_field", "field name is empty"));
                }
                Ok(())
            }
            IngestMode::Overwrite(_) => Ok(()),
            IngestMode::NontemporalDelta(mode) => require_digest(&mode.digest_field),
            IngestMode::UnitemporalDelta(mode) => {
                require_digest(&mode.digest_field)?;
                mode.transaction_milestoning.validate()
            }
            IngestMode::UnitemporalSnapshot(mode) => {
                require_digest(&mode.digest_field)?;
                mode.transaction_milestoning.validate()
            }
            IngestMode::BitemporalDelta(mode) => {
                require_digest(&mode.digest_field)?;
                mode.transaction_milestoning.validate()?;
                mode.validity_milestoning.validate()
            }
            IngestMode::BitemporalSnapshot(mode) => {
                require_digest(&mode.digest_field)?;
                mode.transaction_milestoning.validate()?;
                mode.validity_milestoning.validate()
            }
            IngestMode::BulkLoad(mode) => {
                if mode.batch_id_field.is_empty() {
                    return Err(PlannerError::invalid("batch_id_field", "field name is empty"));
                }
                match &mode.digest_generation {
                    DigestGeneration::UdfBased { udf_name, .. } if udf_name.is_empty() => Err(
                        PlannerError::invalid("digest_generation.udf_name", "UDF name is empty"),
                    ),
                    DigestGeneration::UdfBased { udf_name, .. }
                        if !udf_name
                            .chars()
                            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.') =>
                    {
                        Err(PlannerError::invalid(
                            "digest_generation.udf_name",
                            format!("'{}' is not a plain function name", udf_name),
                        ))
                    }
                    _ => Ok(()),
                }
            }
        }
    }
}

fn require_digest(field: &str) -> PlannerResult<()> {
    if field.is_empty() {
        return Err(PlannerError::invalid("digest_field", "digest field name is empty"));
    }
    Ok(())
}

impl fmt::Display for IngestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
