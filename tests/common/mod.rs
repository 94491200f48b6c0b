//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use milestone::generator::{GeneratorOptions, GeneratorResult, RelationalGenerator};
use milestone::ingest_mode::IngestMode;
use milestone::logical::{DataType, DatasetDefinition, DatasetReference, Field, SchemaDefinition};
use milestone::planner::{Datasets, PlannerOptions};
use milestone::sql::Dialect;

/// Next batch id of `mydb.main`, as rendered by every dialect but BigQuery.
pub const BID: &str = "(SELECT COALESCE(MAX(batch_metadata.\"table_batch_id\"),0)+1 \
    FROM batch_metadata as batch_metadata WHERE UPPER(batch_metadata.\"table_name\") = 'MAIN')";

pub const METADATA_CREATE: &str = "CREATE TABLE IF NOT EXISTS batch_metadata(\"table_name\" VARCHAR(255),\
    \"batch_start_ts_utc\" DATETIME,\"batch_end_ts_utc\" DATETIME,\"batch_status\" VARCHAR(32),\
    \"table_batch_id\" INTEGER,\"staging_filters\" JSON)";

pub const BATCH_START: &str = "'2000-01-01 00:00:00.000000'";

/// Substitute `{BID}` in an expected statement.
pub fn expand(sql: &str) -> String {
    sql.replace("{BID}", BID)
}

pub fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn options(dialect: Dialect) -> GeneratorOptions {
    GeneratorOptions::default()
        .with_dialect(dialect)
        .with_batch_start_timestamp(timestamp())
}

/// `id` and `name` keyed, with a digest.
pub fn staging_fields() -> Vec<Field> {
    vec![
        Field::new("id", DataType::Int).primary_key(),
        Field::new("name", DataType::Varchar).primary_key(),
        Field::new("amount", DataType::Double),
        Field::new("biz_date", DataType::Date),
        Field::new("digest", DataType::Varchar),
    ]
}

pub fn with_field(mut fields: Vec<Field>, field: Field) -> Vec<Field> {
    fields.push(field);
    fields
}

/// Empty `mydb.main` and `mydb.staging` with `staging` as its columns.
pub fn datasets(staging: Vec<Field>) -> Datasets {
    datasets_with_main(Vec::new(), staging)
}

pub fn datasets_with_main(main: Vec<Field>, staging: Vec<Field>) -> Datasets {
    Datasets::new(
        DatasetDefinition::new(
            DatasetReference::new("main").database("mydb"),
            SchemaDefinition::new(main),
        ),
        DatasetDefinition::new(
            DatasetReference::new("staging").database("mydb"),
            SchemaDefinition::new(staging),
        ),
    )
}

pub fn generate(mode: IngestMode, dialect: Dialect, datasets: &Datasets) -> GeneratorResult {
    RelationalGenerator::new(mode, options(dialect))
        .generate(datasets)
        .unwrap()
}

pub fn generate_with(
    mode: IngestMode,
    dialect: Dialect,
    planner: PlannerOptions,
    datasets: &Datasets,
) -> GeneratorResult {
    RelationalGenerator::new(mode, options(dialect).with_planner_options(planner))
        .generate(datasets)
        .unwrap()
}
