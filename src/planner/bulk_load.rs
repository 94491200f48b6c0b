//! Bulk load: `COPY INTO main` straight from staged files.
//!
//! Staged columns are read positionally (`$N`) for delimited files and by
//! path (`$1:name`) for semi-structured rows. The copy may add a UDF digest,
//! file lineage columns, the audit timestamp and the batch id.

use crate::ingest_mode::{BulkLoad, DigestGeneration};
use crate::logical::{
    Copy, DataType, Dataset, DatasetDefinition, DatasetReference, DigestUdf, Field,
    LoadOptions, Operation, Selection, StagedFilesDataset, StagedFilesFieldValue, Value,
};
use crate::sql::{Capability, CapabilitySet};

use super::common::{audit_field, ensure_field, InsertColumns};
use super::statistics::{self, StatisticName};
use super::{Datasets, Planner, PlannerError, PlannerOptions, PlannerResult};

pub const FILE_NAME_FIELD: &str = "file_name";
pub const ROW_NUMBER_FIELD: &str = "row_number";

const ON_ERROR: &str = "ABORT_STATEMENT";

pub struct BulkLoadPlanner<'a> {
    datasets: &'a Datasets,
    files: &'a StagedFilesDataset,
    config: &'a BulkLoad,
    main: DatasetDefinition,
}

impl<'a> BulkLoadPlanner<'a> {
    pub fn new(
        datasets: &'a Datasets,
        files: &'a StagedFilesDataset,
        _options: &'a PlannerOptions,
        capabilities: &'a CapabilitySet,
        config: &'a BulkLoad,
    ) -> PlannerResult<Self> {
        if !capabilities.contains(Capability::TransformWhileCopy) {
            return Err(PlannerError::UnsupportedCapability {
                capability: Capability::TransformWhileCopy,
                node: "BulkLoad".to_string(),
            });
        }
        if files.properties.files.is_empty() && files.properties.patterns.is_empty() {
            return Err(PlannerError::invalid(
                "staging.properties",
                "staged files need at least one file path or pattern",
            ));
        }
        check_unquoted("staging.properties.location", &files.properties.location, |c| {
            c.is_ascii_alphanumeric() || "_@~%./-$".contains(c)
        })?;
        for key in files.properties.format_options.keys() {
            check_unquoted("staging.properties.format_options", key, |c| {
                c.is_ascii_alphanumeric() || c == '_'
            })?;
        }
        if files.properties.file_format.is_semi_structured() {
            for field in &files.schema.fields {
                check_unquoted("staging.schema", &field.name, |c| {
                    c.is_ascii_alphanumeric() || "_$.".contains(c)
                })?;
            }
        }

        let mut fields = if datasets.main.schema.fields.is_empty() {
            files.schema.fields.clone()
        } else {
            datasets.main.schema.fields.clone()
        };
        if let DigestGeneration::UdfBased { field, .. } = &config.digest_generation {
            ensure_field(&mut fields, Field::new(field, DataType::Varchar));
        }
        if config.lineage {
            ensure_field(&mut fields, Field::new(FILE_NAME_FIELD, DataType::Varchar));
            ensure_field(&mut fields, Field::new(ROW_NUMBER_FIELD, DataType::Bigint));
        }
        if let Some(audit) = config.auditing.field() {
            ensure_field(&mut fields, audit_field(audit, false));
        }
        ensure_field(
            &mut fields,
            Field::new(&config.batch_id_field, DataType::Integer),
        );
        let main = datasets.main.with_fields(fields);

        Ok(Self {
            datasets,
            files,
            config,
            main,
        })
    }

    fn batch_id(&self) -> Value {
        self.datasets.metadata.next_batch_id(self.main.name())
    }

    /// The value of staged column `index` (0-based) typed as `field`.
    fn staged_value(&self, index: usize, field: &Field) -> Value {
        let format = self.files.properties.file_format;
        let (column_number, element_path) = if format.is_semi_structured() {
            (1, Some(field.name.clone()))
        } else {
            (index as u32 + 1, None)
        };
        Value::StagedFilesField(StagedFilesFieldValue {
            column_number,
            element_path,
            field_type: field.field_type.clone(),
            file_format: format,
            dataset_alias: self.files.alias().to_string(),
        })
    }

    fn load_options(&self) -> LoadOptions {
        let properties = &self.files.properties;
        LoadOptions {
            file_format: properties.file_format,
            format_options: properties.format_options.clone(),
            files: properties.files.clone(),
            patterns: properties.patterns.clone(),
            on_error: Some(ON_ERROR.to_string()),
        }
    }

    fn sink(&self) -> DatasetReference {
        self.main.reference.clone()
    }
}

/// Stage locations, option keys and element paths render unquoted.
fn check_unquoted(field: &str, value: &str, allowed: fn(char) -> bool) -> PlannerResult<()> {
    if value.is_empty() || !value.chars().all(allowed) {
        return Err(PlannerError::invalid(
            field,
            format!("'{}' contains characters that cannot appear unquoted", value),
        ));
    }
    Ok(())
}

impl Planner for BulkLoadPlanner<'_> {
    fn main(&self) -> &DatasetDefinition {
        &self.main
    }

    fn bookkeeping_fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        if let DigestGeneration::UdfBased { field, .. } = &self.config.digest_generation {
            fields.push(field.clone());
        }
        if self.config.lineage {
            fields.extend([FILE_NAME_FIELD.to_string(), ROW_NUMBER_FIELD.to_string()]);
        }
        fields.extend(self.config.auditing.field().map(str::to_string));
        fields.push(self.config.batch_id_field.clone());
        fields
    }

    fn column_mapping(&self) -> Vec<(String, String)> {
        self.files
            .schema
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.name.clone()))
            .collect()
    }

    fn ingest(&self) -> PlannerResult<Vec<Operation>> {
        let staged: Vec<(String, Value)> = self
            .files
            .schema
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), self.staged_value(i, f)))
            .collect();

        let mut columns = InsertColumns::default();
        for (name, value) in &staged {
            columns.push(name, value.clone());
        }
        if let DigestGeneration::UdfBased { udf_name, field } = &self.config.digest_generation {
            columns.push(
                field,
                Value::DigestUdf(DigestUdf::new(udf_name, staged.iter().cloned())),
            );
        }
        if self.config.lineage {
            columns
                .push(FILE_NAME_FIELD, Value::MetadataFileName)
                .push(ROW_NUMBER_FIELD, Value::MetadataRowNumber);
        }
        if let Some(audit) = self.config.auditing.field() {
            columns.push(audit, Value::BatchStartTimestamp);
        }
        columns.push(&self.config.batch_id_field, self.batch_id());

        let fields = columns.fields();
        Ok(vec![Operation::Copy(Copy {
            target: self.main.reference.clone(),
            fields,
            source: Selection::of(columns.values)
                .from(Dataset::StagedFiles(self.files.reference())),
            load_options: self.load_options(),
        })])
    }

    fn post_ingest_statistics(&self) -> Vec<(StatisticName, Selection)> {
        let loaded = || {
            Some(
                self.sink()
                    .field(&self.config.batch_id_field)
                    .equals(self.batch_id()),
            )
        };
        vec![
            statistics::count(StatisticName::IncomingRecordCount, self.sink(), loaded()),
            statistics::count(StatisticName::RowsInserted, self.sink(), loaded()),
            statistics::zero(StatisticName::RowsUpdated),
            statistics::zero(StatisticName::RowsDeleted),
            statistics::zero(StatisticName::RowsTerminated),
        ]
    }
}
