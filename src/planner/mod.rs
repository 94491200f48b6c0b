//! Ingest-mode planners: IngestMode + datasets -> logical plans.
//!
//! Every generation follows the same skeleton:
//! 1. Pre-actions: create main (and staging when managed), the batch
//!    metadata table and, with concurrent safety, the lock table; then any
//!    schema evolution alters.
//! 2. Ingest: the mode-specific milestoning / upsert statements.
//! 3. Metadata ingest: one row in `batch_metadata` for the new batch.
//! 4. Lock initialize / acquire.
//! 5. Post cleanup of staging.
//! 6. Statistics: side-effect free `SELECT`s, before and after ingest.
//!
//! Only step 2 and the statistics differ between modes; each mode lives in
//! its own module behind the [`Planner`] trait.

pub mod append_only;
pub mod bitemporal;
pub mod bulk_load;
pub mod common;
pub mod lock;
pub mod metadata;
pub mod nontemporal_delta;
pub mod overwrite;
pub mod statistics;
pub mod unitemporal;

pub use common::{DATA_SPLIT_LOWER_BOUND_PLACEHOLDER, DATA_SPLIT_UPPER_BOUND_PLACEHOLDER};
pub use lock::LockInfoDataset;
pub use metadata::MetadataDataset;
pub use statistics::StatisticName;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use crate::ingest_mode::IngestMode;
use crate::logical::{
    Create, DatasetDefinition, Delete, Drop, LogicalPlan, Operation, Selection, StagedFilesDataset,
};
use crate::schema_evolution::SchemaEvolution;
use crate::sql::{Capability, CapabilitySet, Dialect};

use common::PlanScope;

/// Configuration errors, raised before any SQL is produced.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Invalid ingest mode, {field}: {reason}")]
    InvalidIngestMode { field: String, reason: String },

    #[error("Dataset '{dataset}' declares column '{column}' more than once")]
    DuplicateColumn { dataset: String, column: String },

    #[error("Dataset '{dataset}' has no column '{field}'")]
    MissingField { dataset: String, field: String },

    #[error("Primary keys of main {main:?} do not match primary keys of staging {staging:?}")]
    PrimaryKeysMismatch {
        main: Vec<String>,
        staging: Vec<String>,
    },

    #[error("{node} requires capability {capability}")]
    UnsupportedCapability { capability: Capability, node: String },

    #[error("Invalid data splits: {0}")]
    InvalidDataSplits(String),

    #[error("Schema evolution failed: {0}")]
    SchemaEvolution(String),
}

impl PlannerError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PlannerError::InvalidIngestMode {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(dataset: &str, field: &str) -> Self {
        PlannerError::MissingField {
            dataset: dataset.to_string(),
            field: field.to_string(),
        }
    }
}

pub type PlannerResult<T> = Result<T, PlannerError>;

/// Switches shared by every ingest mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerOptions {
    /// Empty the staging table after ingest.
    pub cleanup_staging_data: bool,
    pub collect_statistics: bool,
    pub enable_schema_evolution: bool,
    /// Create staging as a pre-action and drop it afterwards.
    pub create_staging_dataset: bool,
    /// Create and claim a lock row per main table.
    pub enable_concurrent_safety: bool,
    pub batch_success_status: String,
    /// Sentinel `batch_id_out` of open rows.
    pub infinite_batch_id: i64,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            cleanup_staging_data: false,
            collect_statistics: true,
            enable_schema_evolution: false,
            create_staging_dataset: false,
            enable_concurrent_safety: false,
            batch_success_status: "DONE".to_string(),
            infinite_batch_id: 999_999_999,
        }
    }
}

/// Where the rows to ingest come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Staging {
    Table(DatasetDefinition),
    StagedFiles(StagedFilesDataset),
}

/// The tables a generation reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datasets {
    pub main: DatasetDefinition,
    pub staging: Staging,
    #[serde(default)]
    pub metadata: MetadataDataset,
    /// Defaults to `<main>_legend_persistence_lock` next to main.
    #[serde(default)]
    pub lock: Option<LockInfoDataset>,
}

impl Datasets {
    pub fn new(main: DatasetDefinition, staging: DatasetDefinition) -> Self {
        Self {
            main,
            staging: Staging::Table(staging),
            metadata: MetadataDataset::default(),
            lock: None,
        }
    }

    pub fn staged_files(main: DatasetDefinition, staging: StagedFilesDataset) -> Self {
        Self {
            main,
            staging: Staging::StagedFiles(staging),
            metadata: MetadataDataset::default(),
            lock: None,
        }
    }

    pub fn with_metadata(mut self, metadata: MetadataDataset) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_lock(mut self, lock: LockInfoDataset) -> Self {
        self.lock = Some(lock);
        self
    }

    pub fn lock_info(&self) -> LockInfoDataset {
        self.lock
            .clone()
            .unwrap_or_else(|| LockInfoDataset::for_main(&self.main.reference))
    }

    fn validate(&self) -> PlannerResult<()> {
        self.main.schema.validate(self.main.name())?;
        match &self.staging {
            Staging::Table(staging) => staging.schema.validate(staging.name()),
            Staging::StagedFiles(files) => files.schema.validate(&files.properties.location),
        }
    }

    fn staging_table(&self, mode: &IngestMode) -> PlannerResult<&DatasetDefinition> {
        match &self.staging {
            Staging::Table(staging) => Ok(staging),
            Staging::StagedFiles(_) => Err(PlannerError::invalid(
                "staging",
                format!("{} reads from a staging table, not staged files", mode),
            )),
        }
    }
}

/// A mode-specific planner.
pub trait Planner {
    /// Main with the mode's bookkeeping columns appended.
    fn main(&self) -> &DatasetDefinition;

    /// Columns of main the mode writes itself; they take no part in schema
    /// evolution.
    fn bookkeeping_fields(&self) -> Vec<String>;

    /// `(staging column, main column)` pairs carried over as data.
    fn column_mapping(&self) -> Vec<(String, String)>;

    fn ingest(&self) -> PlannerResult<Vec<Operation>>;

    fn pre_ingest_statistics(&self) -> Vec<(StatisticName, Selection)> {
        Vec::new()
    }

    fn post_ingest_statistics(&self) -> Vec<(StatisticName, Selection)>;
}

/// Logical plans of one generation, one per output category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestPlans {
    pub pre_actions: LogicalPlan,
    pub ingest: LogicalPlan,
    pub metadata_ingest: LogicalPlan,
    pub initialize_lock: LogicalPlan,
    pub acquire_lock: LogicalPlan,
    pub post_cleanup: LogicalPlan,
    pub pre_ingest_statistics: BTreeMap<StatisticName, Selection>,
    pub post_ingest_statistics: BTreeMap<StatisticName, Selection>,
}

/// Plan one generation for `mode`.
pub fn plan(
    mode: &IngestMode,
    datasets: &Datasets,
    options: &PlannerOptions,
    dialect: Dialect,
    capabilities: &CapabilitySet,
) -> PlannerResult<IngestPlans> {
    mode.validate()?;
    datasets.validate()?;
    debug!(mode = %mode, main = %datasets.main.name(), "selected planner");

    let planner: Box<dyn Planner + '_> = match mode {
        IngestMode::AppendOnly(config) => {
            let scope = PlanScope::new(datasets, datasets.staging_table(mode)?, options, capabilities, mode)?;
            Box::new(append_only::AppendOnlyPlanner::new(scope, config)?)
        }
        IngestMode::Overwrite(config) => {
            let scope = PlanScope::new(datasets, datasets.staging_table(mode)?, options, capabilities, mode)?;
            Box::new(overwrite::OverwritePlanner::new(scope, config)?)
        }
        IngestMode::NontemporalDelta(config) => {
            let scope = PlanScope::new(datasets, datasets.staging_table(mode)?, options, capabilities, mode)?;
            Box::new(nontemporal_delta::NontemporalDeltaPlanner::new(scope, config)?)
        }
        IngestMode::UnitemporalDelta(config) => {
            let scope = PlanScope::new(datasets, datasets.staging_table(mode)?, options, capabilities, mode)?;
            Box::new(unitemporal::UnitemporalDeltaPlanner::new(scope, config)?)
        }
        IngestMode::UnitemporalSnapshot(config) => {
            let scope = PlanScope::new(datasets, datasets.staging_table(mode)?, options, capabilities, mode)?;
            Box::new(unitemporal::UnitemporalSnapshotPlanner::new(scope, config)?)
        }
        IngestMode::BitemporalDelta(config) => {
            let scope = PlanScope::new(datasets, datasets.staging_table(mode)?, options, capabilities, mode)?;
            Box::new(bitemporal::BitemporalDeltaPlanner::new(scope, config)?)
        }
        IngestMode::BitemporalSnapshot(config) => {
            let scope = PlanScope::new(datasets, datasets.staging_table(mode)?, options, capabilities, mode)?;
            Box::new(bitemporal::BitemporalSnapshotPlanner::new(scope, config)?)
        }
        IngestMode::BulkLoad(config) => {
            let Staging::StagedFiles(files) = &datasets.staging else {
                return Err(PlannerError::invalid(
                    "staging",
                    "bulk_load reads from staged files",
                ));
            };
            Box::new(bulk_load::BulkLoadPlanner::new(
                datasets,
                files,
                options,
                capabilities,
                config,
            )?)
        }
    };

    let main = planner.main();
    let lock = datasets.lock_info();
    let staging = match &datasets.staging {
        Staging::Table(staging) => Some(staging),
        Staging::StagedFiles(_) => None,
    };

    let mut pre_actions = vec![Create::if_not_exists(main.clone())];
    if options.create_staging_dataset {
        if let Some(staging) = staging {
            pre_actions.push(Create::if_not_exists(staging.clone()));
        }
    }
    pre_actions.push(datasets.metadata.create());
    if options.enable_concurrent_safety {
        pre_actions.push(lock.create());
    }
    if options.enable_schema_evolution {
        let evolution = SchemaEvolution::new(dialect, capabilities);
        pre_actions.extend(evolution.alters(
            main,
            &staging_fields(datasets),
            &planner.column_mapping(),
            &planner.bookkeeping_fields(),
        )?);
    }

    let mut post_cleanup = Vec::new();
    if let Some(staging) = staging {
        if options.create_staging_dataset {
            post_cleanup.push(Operation::Drop(Drop {
                dataset: staging.reference.clone(),
                if_exists: true,
                cascade: true,
            }));
        } else if options.cleanup_staging_data {
            post_cleanup.push(Operation::Delete(Delete {
                dataset: staging.reference.with_alias(common::STAGE),
                condition: None,
            }));
        }
    }

    let (initialize_lock, acquire_lock) = if options.enable_concurrent_safety {
        (
            LogicalPlan::of(lock.initialize(main.name())),
            LogicalPlan::of(lock.acquire()),
        )
    } else {
        (LogicalPlan::default(), LogicalPlan::default())
    };

    let (pre_ingest_statistics, post_ingest_statistics) = if options.collect_statistics {
        (
            planner.pre_ingest_statistics().into_iter().collect(),
            planner.post_ingest_statistics().into_iter().collect(),
        )
    } else {
        (BTreeMap::new(), BTreeMap::new())
    };

    Ok(IngestPlans {
        pre_actions: LogicalPlan::new(pre_actions),
        ingest: LogicalPlan::new(planner.ingest()?),
        metadata_ingest: LogicalPlan::of(
            datasets
                .metadata
                .ingest(main.name(), &options.batch_success_status),
        ),
        initialize_lock,
        acquire_lock,
        post_cleanup: LogicalPlan::new(post_cleanup),
        pre_ingest_statistics,
        post_ingest_statistics,
    })
}

fn staging_fields(datasets: &Datasets) -> Vec<crate::logical::Field> {
    match &datasets.staging {
        Staging::Table(staging) => staging.schema.fields.clone(),
        Staging::StagedFiles(files) => files.schema.fields.clone(),
    }
}
