#[path = "../common/mod.rs"]
mod common;

use std::collections::BTreeMap;

use common::{datasets, generate, generate_with, options, staging_fields};
use milestone::generator::{GeneratorError, RelationalGenerator};
use milestone::ingest_mode::{AppendOnly, IngestMode};
use milestone::logical::{DatasetAdditionalProperties, DataType, Field, IcebergProperties};
use milestone::planner::{Datasets, PlannerOptions};
use milestone::sql::Dialect;

fn iceberg() -> DatasetAdditionalProperties {
    DatasetAdditionalProperties::iceberg(IcebergProperties {
        catalog: "SNOWFLAKE".to_string(),
        external_volume: "my_ext_vol".to_string(),
        base_location: "my_location".to_string(),
    })
}

fn with_main_properties(mut datasets: Datasets, properties: DatasetAdditionalProperties) -> Datasets {
    datasets.main = datasets.main.with_properties(properties);
    datasets
}

fn tagged() -> DatasetAdditionalProperties {
    DatasetAdditionalProperties {
        tags: BTreeMap::from([
            ("domain".to_string(), "finance".to_string()),
            ("owner".to_string(), "ingest".to_string()),
        ]),
        ..Default::default()
    }
}

#[test]
fn test_create_iceberg_table() {
    let datasets = with_main_properties(datasets(staging_fields()), iceberg());
    let result = generate(
        IngestMode::AppendOnly(AppendOnly::default()),
        Dialect::Snowflake,
        &datasets,
    );

    assert_eq!(
        result.pre_actions[0],
        "CREATE ICEBERG TABLE IF NOT EXISTS \"mydb\".\"main\"(\"id\" INTEGER NOT NULL,\
         \"name\" VARCHAR NOT NULL,\"amount\" DOUBLE,\"biz_date\" DATE,\"digest\" VARCHAR,\
         \"batch_id\" INTEGER,PRIMARY KEY (\"id\", \"name\")) \
         CATALOG='SNOWFLAKE', EXTERNAL_VOLUME='my_ext_vol', BASE_LOCATION='my_location'"
    );
    // Only main is an Iceberg table.
    assert!(result.pre_actions[1].starts_with("CREATE TABLE IF NOT EXISTS batch_metadata("));
}

#[test]
fn test_alter_iceberg_table() {
    let main = vec![
        Field::new("id", DataType::Int).primary_key(),
        Field::new("name", DataType::Varchar).primary_key(),
        Field::new("amount", DataType::Double),
        Field::new("digest", DataType::Varchar),
        Field::new("batch_id", DataType::Integer),
    ];
    let datasets = with_main_properties(
        common::datasets_with_main(main, staging_fields()),
        iceberg(),
    );
    let planner = PlannerOptions {
        enable_schema_evolution: true,
        ..Default::default()
    };
    let result = generate_with(
        IngestMode::AppendOnly(AppendOnly::default()),
        Dialect::Snowflake,
        planner,
        &datasets,
    );

    assert_eq!(
        result.pre_actions[2],
        "ALTER ICEBERG TABLE \"mydb\".\"main\" ADD COLUMN \"biz_date\" DATE"
    );
}

#[test]
fn test_create_with_tags() {
    let datasets = with_main_properties(datasets(staging_fields()), tagged());
    let result = generate(
        IngestMode::AppendOnly(AppendOnly::default()),
        Dialect::Snowflake,
        &datasets,
    );

    assert!(result.pre_actions[0].starts_with("CREATE TABLE IF NOT EXISTS \"mydb\".\"main\"("));
    assert!(result.pre_actions[0]
        .ends_with("PRIMARY KEY (\"id\", \"name\")) WITH TAG (domain = 'finance', owner = 'ingest')"));
}

#[test]
fn test_tags_are_skipped_without_support() {
    let datasets = with_main_properties(datasets(staging_fields()), tagged());
    let result = generate(
        IngestMode::AppendOnly(AppendOnly::default()),
        Dialect::Ansi,
        &datasets,
    );

    assert!(result.pre_actions[0].ends_with("PRIMARY KEY (\"id\", \"name\"))"));
}

#[test]
fn test_iceberg_needs_support() {
    let datasets = with_main_properties(datasets(staging_fields()), iceberg());
    let err = RelationalGenerator::new(
        IngestMode::AppendOnly(AppendOnly::default()),
        options(Dialect::Ansi),
    )
    .generate(&datasets)
    .unwrap_err();

    assert!(matches!(err, GeneratorError::Transform(_)));
}
