//! Pieces shared by the table-staged planners: aliases, key matching,
//! data-split filters, delete indicators and main-table enrichment.

use crate::ingest_mode::{IngestMode, MergeStrategy};
use crate::logical::{
    Condition, DataType, Dataset, DatasetDefinition, DatasetReference, Field, Insert, Operation,
    Selection, Value,
};
use crate::sql::CapabilitySet;

use super::{Datasets, MetadataDataset, PlannerError, PlannerOptions, PlannerResult};

pub const SINK: &str = "sink";
pub const STAGE: &str = "stage";
/// Second alias of main, used when a subquery correlates main with itself.
pub const SINK_SUCCESSOR: &str = "sink2";

pub const DATA_SPLIT_LOWER_BOUND_PLACEHOLDER: &str = "{DATA_SPLIT_LOWER_BOUND_PLACEHOLDER}";
pub const DATA_SPLIT_UPPER_BOUND_PLACEHOLDER: &str = "{DATA_SPLIT_UPPER_BOUND_PLACEHOLDER}";

/// Sentinel `batch_time_out` / `validity_through` of open rows.
pub const MAX_DATETIME: &str = "9999-12-31 23:59:59";

/// Delete-indicator column with its values typed after the staging column.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteIndicator {
    pub field: String,
    pub values: Vec<Value>,
}

impl DeleteIndicator {
    pub fn resolve(
        strategy: &MergeStrategy,
        staging: &DatasetDefinition,
    ) -> PlannerResult<Option<Self>> {
        let MergeStrategy::DeleteIndicator { field, values } = strategy else {
            return Ok(None);
        };
        let column = staging
            .schema
            .field(field)
            .ok_or_else(|| PlannerError::missing(staging.name(), field))?;
        let values = values
            .iter()
            .map(|raw| {
                Value::typed_literal(column.data_type(), raw).ok_or_else(|| {
                    PlannerError::invalid(
                        "merge_strategy.values",
                        format!("'{}' is not a valid {} value", raw, column.data_type()),
                    )
                })
            })
            .collect::<PlannerResult<Vec<_>>>()?;
        Ok(Some(Self {
            field: field.clone(),
            values,
        }))
    }

    /// `stage.<field> IN (<values>)`
    pub fn deleted(&self, stage: &DatasetReference) -> Condition {
        stage.field(&self.field).is_in(self.values.clone())
    }

    /// `stage.<field> NOT IN (<values>)`
    pub fn kept(&self, stage: &DatasetReference) -> Condition {
        stage.field(&self.field).not_in(self.values.clone())
    }
}

/// Resolved inputs of a planner reading from a staging table.
#[derive(Debug, Clone)]
pub struct PlanScope<'a> {
    /// Main as declared, or derived from staging when it has no columns.
    pub main: DatasetDefinition,
    pub staging: &'a DatasetDefinition,
    pub sink: DatasetReference,
    pub stage: DatasetReference,
    pub metadata: &'a MetadataDataset,
    pub options: &'a PlannerOptions,
    pub capabilities: &'a CapabilitySet,
    pub data_split_field: Option<String>,
    pub delete_indicator: Option<DeleteIndicator>,
}

impl<'a> PlanScope<'a> {
    pub fn new(
        datasets: &'a Datasets,
        staging: &'a DatasetDefinition,
        options: &'a PlannerOptions,
        capabilities: &'a CapabilitySet,
        mode: &IngestMode,
    ) -> PlannerResult<Self> {
        let data_split_field = mode.data_split_field().map(str::to_string);
        if let Some(split) = &data_split_field {
            if !staging.schema.contains(split) {
                return Err(PlannerError::missing(staging.name(), split));
            }
        }
        let delete_indicator = DeleteIndicator::resolve(mode.merge_strategy(), staging)?;

        let mut scope = Self {
            main: datasets.main.clone(),
            staging,
            sink: datasets.main.reference.with_alias(SINK),
            stage: staging.reference.with_alias(STAGE),
            metadata: &datasets.metadata,
            options,
            capabilities,
            data_split_field,
            delete_indicator,
        };
        if scope.main.schema.fields.is_empty() {
            let fields = scope.staging_data_fields().into_iter().cloned().collect();
            scope.main = scope.main.with_fields(fields);
        }
        Ok(scope)
    }

    fn is_instruction(&self, name: &str) -> bool {
        self.data_split_field.as_deref() == Some(name)
            || self.delete_indicator.as_ref().map(|d| d.field.as_str()) == Some(name)
    }

    /// Identity mapping of the staging data columns.
    pub fn identity_mapping(&self) -> Vec<(String, String)> {
        self.staging_data_fields()
            .into_iter()
            .map(|f| (f.name.clone(), f.name.clone()))
            .collect()
    }

    /// Staging columns carried into main: everything but the data-split and
    /// delete-indicator columns.
    pub fn staging_data_fields(&self) -> Vec<&'a Field> {
        self.staging
            .schema
            .fields
            .iter()
            .filter(|f| !self.is_instruction(&f.name))
            .collect()
    }

    /// Main primary keys that staging also carries.
    pub fn key_fields(&self) -> Vec<String> {
        self.main
            .schema
            .primary_keys()
            .filter(|f| self.staging.schema.contains(&f.name))
            .map(|f| f.name.clone())
            .collect()
    }

    /// Fails when staging declares primary keys that disagree with main's.
    pub fn check_primary_keys(&self, mapping: &[(String, String)]) -> PlannerResult<()> {
        let mapped = |name: &str| {
            mapping
                .iter()
                .find(|(from, _)| from == name)
                .map(|(_, to)| to.clone())
                .unwrap_or_else(|| name.to_string())
        };
        let mut staging: Vec<String> = self
            .staging
            .schema
            .primary_keys()
            .map(|f| mapped(&f.name))
            .collect();
        if staging.is_empty() {
            return Ok(());
        }
        let carried: Vec<String> = mapping.iter().map(|(_, to)| to.clone()).collect();
        let mut main: Vec<String> = self
            .main
            .schema
            .primary_keys()
            .filter(|f| carried.contains(&f.name))
            .map(|f| f.name.clone())
            .collect();
        staging.sort();
        main.sort();
        if staging != main {
            return Err(PlannerError::PrimaryKeysMismatch { main, staging });
        }
        Ok(())
    }

    /// Modes that match rows need at least one key.
    pub fn require_keys(&self) -> PlannerResult<Vec<String>> {
        let keys = self.key_fields();
        if keys.is_empty() {
            return Err(PlannerError::invalid(
                "primary_keys",
                format!(
                    "'{}' needs at least one primary key shared with '{}'",
                    self.main.name(),
                    self.staging.name()
                ),
            ));
        }
        Ok(keys)
    }

    pub fn require_staging_field(&self, name: &str) -> PlannerResult<()> {
        if self.staging.schema.contains(name) {
            Ok(())
        } else {
            Err(PlannerError::missing(self.staging.name(), name))
        }
    }

    /// `left.k1 = right.k1 AND ...`, or `None` without keys.
    pub fn keys_match(
        &self,
        keys: &[String],
        left: &DatasetReference,
        right: &DatasetReference,
    ) -> Option<Condition> {
        if keys.is_empty() {
            return None;
        }
        Some(Condition::and(
            keys.iter()
                .map(|k| left.field(k).equals(right.field(k)))
                .collect(),
        ))
    }

    /// `(stage.split >= '{lower}') AND (stage.split <= '{upper}')`; the
    /// placeholders are substituted per range after rendering.
    pub fn data_split_condition(&self) -> Option<Condition> {
        self.data_split_field.as_ref().map(|split| {
            Condition::and(vec![
                self.stage
                    .field(split)
                    .gte(Value::string(DATA_SPLIT_LOWER_BOUND_PLACEHOLDER)),
                self.stage
                    .field(split)
                    .lte(Value::string(DATA_SPLIT_UPPER_BOUND_PLACEHOLDER)),
            ])
        })
    }

    pub fn batch_id(&self) -> Value {
        self.metadata.next_batch_id(self.main.name())
    }

    pub fn infinite_batch_id(&self) -> Value {
        Value::Integer(self.options.infinite_batch_id)
    }

    /// `SELECT * FROM main as sink`
    pub fn sink_rows(&self) -> Selection {
        Selection::all_from(self.sink.clone())
    }

    /// `SELECT * FROM staging as stage`
    pub fn stage_rows(&self) -> Selection {
        Selection::all_from(self.stage.clone())
    }
}

/// Target columns of an insert paired with the values written to them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertColumns {
    pub names: Vec<String>,
    pub values: Vec<Value>,
}

impl InsertColumns {
    /// `stage.<from>` into `<to>` for each mapped column.
    pub fn mapped(mapping: &[(String, String)], stage: &DatasetReference) -> Self {
        let mut columns = Self::default();
        for (from, to) in mapping {
            columns.push(to, stage.field(from));
        }
        columns
    }

    pub fn push(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.names.push(name.into());
        self.values.push(value);
        self
    }

    pub fn fields(&self) -> Vec<Value> {
        bare_fields(self.names.iter().map(String::as_str))
    }

    /// `INSERT INTO <target> (<names>) (SELECT <values> FROM <source> [WHERE ...])`
    pub fn insert(
        self,
        target: &DatasetReference,
        source: impl Into<Dataset>,
        condition: Option<Condition>,
    ) -> Operation {
        Operation::Insert(Insert {
            target: target.clone(),
            fields: self.fields(),
            source: Selection::of(self.values).from(source).filter_opt(condition),
        })
    }
}

/// Unqualified column list of an insert.
pub fn bare_fields<'n>(names: impl IntoIterator<Item = &'n str>) -> Vec<Value> {
    names
        .into_iter()
        .map(|name| Value::Field(crate::logical::FieldValue::bare(name)))
        .collect()
}

/// Append `field` unless main already has a column of that name.
pub fn ensure_field(main: &mut Vec<Field>, field: Field) {
    if !main.iter().any(|f| f.name == field.name) {
        main.push(field);
    }
}

/// `DATETIME` audit column.
pub fn audit_field(name: &str, primary_key: bool) -> Field {
    let field = Field::new(name, DataType::Datetime);
    if primary_key {
        field.primary_key()
    } else {
        field
    }
}

/// Whether `fields` declares any primary key.
pub fn has_primary_key(fields: &[Field]) -> bool {
    fields.iter().any(|f| f.primary_key)
}
