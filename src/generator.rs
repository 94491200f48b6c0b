//! End-to-end generation from an ingest mode and datasets to SQL.
//!
//! ```text
//! IngestMode + Datasets → plan → LogicalPlan × 6 → transform → SQL sections
//! ```
//!
//! # Example
//!
//! ```ignore
//! use milestone::generator::{GeneratorOptions, RelationalGenerator};
//! use milestone::ingest_mode::{IngestMode, UnitemporalDelta};
//! use milestone::sql::Dialect;
//!
//! let mode = IngestMode::UnitemporalDelta(UnitemporalDelta::default());
//! let options = GeneratorOptions::default().with_dialect(Dialect::Snowflake);
//! let result = RelationalGenerator::new(mode, options).generate(&datasets)?;
//! for sql in &result.ingest {
//!     println!("{sql};");
//! }
//! ```

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use crate::ingest_mode::{DataSplitRange, IngestMode};
use crate::logical::{LogicalPlan, Selection};
use crate::physical::{
    LowerCaseOptimizer, RelationalTransformer, TransformError, UpperCaseOptimizer, VisitorContext,
};
use crate::planner::{
    self, Datasets, PlannerError, PlannerOptions, StatisticName,
    DATA_SPLIT_LOWER_BOUND_PLACEHOLDER, DATA_SPLIT_UPPER_BOUND_PLACEHOLDER,
};
use crate::sql::{CapabilitySet, Dialect};
use crate::visitors::registry;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during generation.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Planning error: {0}")]
    Planner(#[from] PlannerError),

    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    #[error("Invalid data splits: {0}")]
    InvalidDataSplits(String),
}

pub type GenerateResult<T> = Result<T, GeneratorError>;

// ============================================================================
// Options
// ============================================================================

/// Identifier case folding applied to the generated SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseConversion {
    #[default]
    None,
    Upper,
    Lower,
}

/// Options for generation.
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    /// SQL dialect to generate.
    pub dialect: Dialect,
    pub case_conversion: CaseConversion,
    pub planner: PlannerOptions,
    /// Fixed batch start time; the current UTC time when unset.
    pub batch_start_timestamp: Option<NaiveDateTime>,
    /// Sink capabilities; the dialect's own when unset.
    pub capabilities: Option<CapabilitySet>,
    /// Emit unquoted identifiers.
    pub unquoted_identifiers: bool,
}

impl GeneratorOptions {
    /// Set the SQL dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_case_conversion(mut self, case_conversion: CaseConversion) -> Self {
        self.case_conversion = case_conversion;
        self
    }

    pub fn with_planner_options(mut self, planner: PlannerOptions) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_batch_start_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.batch_start_timestamp = Some(timestamp);
        self
    }

    pub fn with_capabilities(mut self, capabilities: CapabilitySet) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    fn capability_set(&self) -> &CapabilitySet {
        self.capabilities
            .as_ref()
            .unwrap_or_else(|| self.dialect.capability_set())
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// SQL of one generation, grouped by when each statement runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorResult {
    pub pre_actions: Vec<String>,
    pub initialize_lock: Vec<String>,
    pub acquire_lock: Vec<String>,
    pub ingest: Vec<String>,
    pub metadata_ingest: Vec<String>,
    pub post_cleanup: Vec<String>,
    pub pre_ingest_statistics: BTreeMap<StatisticName, String>,
    pub post_ingest_statistics: BTreeMap<StatisticName, String>,
}

impl GeneratorResult {
    /// Mutating statements in execution order. Statistics are excluded.
    pub fn statements(&self) -> impl Iterator<Item = &String> {
        self.pre_actions
            .iter()
            .chain(&self.initialize_lock)
            .chain(&self.acquire_lock)
            .chain(&self.ingest)
            .chain(&self.metadata_ingest)
            .chain(&self.post_cleanup)
    }

    /// This result with the data-split placeholders bound to `range`.
    fn bind(&self, range: DataSplitRange) -> Self {
        let bind = |sql: &String| bind_placeholders(sql, range);
        let bind_all = |sqls: &[String]| sqls.iter().map(bind).collect::<Vec<_>>();
        let bind_stats = |stats: &BTreeMap<StatisticName, String>| {
            stats.iter().map(|(name, sql)| (*name, bind(sql))).collect()
        };
        Self {
            pre_actions: bind_all(&self.pre_actions),
            initialize_lock: bind_all(&self.initialize_lock),
            acquire_lock: bind_all(&self.acquire_lock),
            ingest: bind_all(&self.ingest),
            metadata_ingest: bind_all(&self.metadata_ingest),
            post_cleanup: bind_all(&self.post_cleanup),
            pre_ingest_statistics: bind_stats(&self.pre_ingest_statistics),
            post_ingest_statistics: bind_stats(&self.post_ingest_statistics),
        }
    }
}

/// Replace the quoted placeholders first so the bounds render as numbers.
fn bind_placeholders(sql: &str, range: DataSplitRange) -> String {
    let lower = range.lower.to_string();
    let upper = range.upper.to_string();
    sql.replace(&format!("'{}'", DATA_SPLIT_LOWER_BOUND_PLACEHOLDER), &lower)
        .replace(&format!("'{}'", DATA_SPLIT_UPPER_BOUND_PLACEHOLDER), &upper)
        .replace(DATA_SPLIT_LOWER_BOUND_PLACEHOLDER, &lower)
        .replace(DATA_SPLIT_UPPER_BOUND_PLACEHOLDER, &upper)
}

/// Ranges must be non-empty, ascending and contiguous.
fn validate_splits(ranges: &[DataSplitRange]) -> GenerateResult<()> {
    if ranges.is_empty() {
        return Err(GeneratorError::InvalidDataSplits(
            "at least one range is required".to_string(),
        ));
    }
    for range in ranges {
        if range.lower > range.upper {
            return Err(GeneratorError::InvalidDataSplits(format!(
                "range {} has its lower bound above its upper bound",
                range
            )));
        }
    }
    for pair in ranges.windows(2) {
        if pair[0].upper.checked_add(1) != Some(pair[1].lower) {
            return Err(GeneratorError::InvalidDataSplits(format!(
                "range {} does not directly follow {}",
                pair[1], pair[0]
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Generator
// ============================================================================

/// Plans and renders one ingest mode for one dialect.
pub struct RelationalGenerator {
    mode: IngestMode,
    options: GeneratorOptions,
}

impl RelationalGenerator {
    pub fn new(mode: IngestMode, options: GeneratorOptions) -> Self {
        Self { mode, options }
    }

    pub fn mode(&self) -> &IngestMode {
        &self.mode
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    fn transformer(&self) -> RelationalTransformer<'static> {
        let timestamp = self
            .options
            .batch_start_timestamp
            .unwrap_or_else(|| Utc::now().naive_utc());
        let mut context = VisitorContext::new(self.options.dialect, timestamp)
            .with_capabilities(self.options.capability_set().clone())
            .with_quote_identifiers(!self.options.unquoted_identifiers);
        context = match self.options.case_conversion {
            CaseConversion::None => context,
            CaseConversion::Upper => context.with_optimizer(Box::new(UpperCaseOptimizer)),
            CaseConversion::Lower => context.with_optimizer(Box::new(LowerCaseOptimizer)),
        };
        RelationalTransformer::new(registry(), context)
    }

    /// Generate SQL with data-split bounds left as placeholders.
    pub fn generate(&self, datasets: &Datasets) -> GenerateResult<GeneratorResult> {
        let _span = info_span!(
            "generate",
            table = %datasets.main.name(),
            mode = %self.mode,
            dialect = %self.options.dialect
        )
        .entered();

        let plans = planner::plan(
            &self.mode,
            datasets,
            &self.options.planner,
            self.options.dialect,
            self.options.capability_set(),
        )?;
        let transformer = self.transformer();
        let render = |plan: &LogicalPlan| transformer.generate(plan);
        let render_stats = |stats: &BTreeMap<StatisticName, Selection>| {
            stats
                .iter()
                .map(|(name, selection)| -> GenerateResult<(StatisticName, String)> {
                    Ok((*name, transformer.generate_selection(selection)?))
                })
                .collect::<GenerateResult<BTreeMap<_, _>>>()
        };

        let result = GeneratorResult {
            pre_actions: render(&plans.pre_actions)?,
            initialize_lock: render(&plans.initialize_lock)?,
            acquire_lock: render(&plans.acquire_lock)?,
            ingest: render(&plans.ingest)?,
            metadata_ingest: render(&plans.metadata_ingest)?,
            post_cleanup: render(&plans.post_cleanup)?,
            pre_ingest_statistics: render_stats(&plans.pre_ingest_statistics)?,
            post_ingest_statistics: render_stats(&plans.post_ingest_statistics)?,
        };
        debug!(
            statements = result.statements().count(),
            statistics = result.post_ingest_statistics.len(),
            "generated"
        );
        Ok(result)
    }

    /// Generate one result per data-split range, bounds substituted.
    pub fn generate_with_splits(
        &self,
        datasets: &Datasets,
        ranges: &[DataSplitRange],
    ) -> GenerateResult<Vec<GeneratorResult>> {
        if self.mode.data_split_field().is_none() {
            return Err(GeneratorError::InvalidDataSplits(format!(
                "{} has no data split field",
                self.mode
            )));
        }
        validate_splits(ranges)?;
        let template = self.generate(datasets)?;
        Ok(ranges.iter().map(|range| template.bind(*range)).collect())
    }
}
