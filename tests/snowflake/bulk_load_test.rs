#[path = "../common/mod.rs"]
mod common;

use std::collections::BTreeMap;

use common::options;
use milestone::generator::{CaseConversion, GeneratorError, GeneratorResult, RelationalGenerator};
use milestone::ingest_mode::{Auditing, BulkLoad, DigestGeneration, IngestMode};
use milestone::logical::{
    DataType, DatasetDefinition, DatasetReference, Field, FileFormat, SchemaDefinition,
    StagedFilesDataset, StagedFilesProperties,
};
use milestone::planner::{Datasets, PlannerError, StatisticName};
use milestone::sql::{Capability, Dialect};

const MY_NAME_BID: &str = "(SELECT COALESCE(MAX(batch_metadata.\"table_batch_id\"),0)+1 \
    FROM batch_metadata as batch_metadata WHERE UPPER(batch_metadata.\"table_name\") = 'MY_NAME')";

fn staged_files(format: FileFormat, fields: Vec<Field>) -> Datasets {
    let files = StagedFilesDataset {
        properties: StagedFilesProperties {
            location: "my_location".to_string(),
            file_format: format,
            files: vec!["/path/xyz/file1.csv".to_string()],
            patterns: Vec::new(),
            format_options: BTreeMap::new(),
        },
        schema: SchemaDefinition::new(fields),
        alias: None,
    };
    Datasets::staged_files(
        DatasetDefinition::new(
            DatasetReference::new("my_name").database("my_db"),
            SchemaDefinition::default(),
        ),
        files,
    )
}

fn csv_fields() -> Vec<Field> {
    vec![
        Field::new("col_int", DataType::Integer).not_null(),
        Field::new("col_string", DataType::Varchar),
    ]
}

fn full_bulk_load() -> IngestMode {
    IngestMode::BulkLoad(BulkLoad {
        digest_generation: DigestGeneration::UdfBased {
            udf_name: "LAKEHOUSE_MD5".to_string(),
            field: "digest".to_string(),
        },
        auditing: Auditing::date_time("batch_update_time"),
        lineage: true,
        ..Default::default()
    })
}

fn generate(mode: IngestMode, datasets: &Datasets) -> GeneratorResult {
    RelationalGenerator::new(mode, options(Dialect::Snowflake))
        .generate(datasets)
        .unwrap()
}

#[test]
fn test_bulk_load_csv_with_digest_lineage_and_auditing() {
    let result = generate(full_bulk_load(), &staged_files(FileFormat::Csv, csv_fields()));

    assert_eq!(
        result.pre_actions[0],
        "CREATE TABLE IF NOT EXISTS \"my_db\".\"my_name\"(\"col_int\" INTEGER NOT NULL,\
         \"col_string\" VARCHAR,\"digest\" VARCHAR,\"file_name\" VARCHAR,\"row_number\" BIGINT,\
         \"batch_update_time\" DATETIME,\"batch_id\" INTEGER)"
    );
    assert_eq!(
        result.ingest,
        vec![format!(
            "COPY INTO \"my_db\".\"my_name\" (\"col_int\", \"col_string\", \"digest\", \"file_name\", \
             \"row_number\", \"batch_update_time\", \"batch_id\") \
             FROM (SELECT legend_persistence_stage.$1,legend_persistence_stage.$2,\
             LAKEHOUSE_MD5(OBJECT_CONSTRUCT('col_int',legend_persistence_stage.$1,\
             'col_string',legend_persistence_stage.$2)),\
             METADATA$FILENAME,METADATA$FILE_ROW_NUMBER,'2000-01-01 00:00:00.000000',{} \
             FROM my_location as legend_persistence_stage) \
             FILES = ('/path/xyz/file1.csv') FILE_FORMAT = (TYPE = 'CSV') ON_ERROR = 'ABORT_STATEMENT'",
            MY_NAME_BID
        )]
    );
}

#[test]
fn test_bulk_load_statistics() {
    let result = generate(
        IngestMode::BulkLoad(BulkLoad::default()),
        &staged_files(FileFormat::Csv, csv_fields()),
    );
    let stats = &result.post_ingest_statistics;

    let inserted = format!(
        "SELECT COUNT(*) as \"rowsInserted\" FROM \"my_db\".\"my_name\" as my_name \
         WHERE my_name.\"batch_id\" = {}",
        MY_NAME_BID
    );
    assert_eq!(stats[&StatisticName::RowsInserted], inserted);
    assert_eq!(
        stats[&StatisticName::IncomingRecordCount],
        inserted.replace("rowsInserted", "incomingRecordCount")
    );
    assert_eq!(stats[&StatisticName::RowsUpdated], "SELECT 0 as \"rowsUpdated\"");
    assert!(result.metadata_ingest[0].contains("(SELECT 'my_name',"));
}

#[test]
fn test_bulk_load_json_reads_paths() {
    let result = generate(
        IngestMode::BulkLoad(BulkLoad::default()),
        &staged_files(FileFormat::Json, csv_fields()),
    );

    assert!(result.ingest[0].contains(
        "FROM (SELECT legend_persistence_stage.$1:col_int,legend_persistence_stage.$1:col_string,"
    ));
    assert!(result.ingest[0].contains("FILE_FORMAT = (TYPE = 'JSON')"));
}

#[test]
fn test_bulk_load_avro_converts_temporal_columns() {
    let fields = vec![
        Field::new("event_date", DataType::Date),
        Field::new("event_time", DataType::Timestamp),
        Field::new("payload", DataType::Varchar),
    ];
    let result = generate(
        IngestMode::BulkLoad(BulkLoad::default()),
        &staged_files(FileFormat::Avro, fields),
    );

    assert!(result.ingest[0].contains(
        "FROM (SELECT TO_DATE(legend_persistence_stage.$1:event_date),\
         TO_TIMESTAMP(legend_persistence_stage.$1:event_time),\
         legend_persistence_stage.$1:payload,"
    ));
}

#[test]
fn test_bulk_load_csv_parses_semi_structured_columns() {
    let fields = vec![
        Field::new("id", DataType::Integer),
        Field::new("attributes", DataType::Variant),
    ];
    let result = generate(
        IngestMode::BulkLoad(BulkLoad::default()),
        &staged_files(FileFormat::Csv, fields),
    );

    assert!(result.pre_actions[0].contains("\"attributes\" VARIANT"));
    assert!(result.ingest[0].contains(
        "(SELECT legend_persistence_stage.$1,PARSE_JSON(legend_persistence_stage.$2),"
    ));
}

#[test]
fn test_bulk_load_patterns_and_format_options() {
    let mut datasets = staged_files(FileFormat::Csv, csv_fields());
    if let milestone::planner::Staging::StagedFiles(files) = &mut datasets.staging {
        files.properties.files.clear();
        files.properties.patterns = vec!["(/path/xyz/file1)(.)*".to_string(), "(/path/xyz/file2)(.)*".to_string()];
        files.properties.format_options = BTreeMap::from([
            ("field_delimiter".to_string(), ",".to_string()),
            ("skip_header".to_string(), "1".to_string()),
        ]);
    }
    let result = generate(IngestMode::BulkLoad(BulkLoad::default()), &datasets);

    assert!(result.ingest[0].ends_with(
        "FROM my_location as legend_persistence_stage) \
         PATTERN = '(/path/xyz/file1)(.)*|(/path/xyz/file2)(.)*' \
         FILE_FORMAT = (TYPE = 'CSV', FIELD_DELIMITER = ',', SKIP_HEADER = 1) \
         ON_ERROR = 'ABORT_STATEMENT'"
    ));
}

#[test]
fn test_bulk_load_needs_transform_while_copy() {
    let err = RelationalGenerator::new(IngestMode::BulkLoad(BulkLoad::default()), options(Dialect::Ansi))
        .generate(&staged_files(FileFormat::Csv, csv_fields()))
        .unwrap_err();

    assert!(matches!(
        err,
        GeneratorError::Planner(PlannerError::UnsupportedCapability {
            capability: Capability::TransformWhileCopy,
            ..
        })
    ));
}

#[test]
fn test_bulk_load_needs_files_or_patterns() {
    let mut datasets = staged_files(FileFormat::Csv, csv_fields());
    if let milestone::planner::Staging::StagedFiles(files) = &mut datasets.staging {
        files.properties.files.clear();
    }
    let err = RelationalGenerator::new(IngestMode::BulkLoad(BulkLoad::default()), options(Dialect::Snowflake))
        .generate(&datasets)
        .unwrap_err();

    assert!(matches!(
        err,
        GeneratorError::Planner(PlannerError::InvalidIngestMode { .. })
    ));
}

#[test]
fn test_bulk_load_rejects_quote_in_location() {
    let mut datasets = staged_files(FileFormat::Csv, csv_fields());
    if let milestone::planner::Staging::StagedFiles(files) = &mut datasets.staging {
        files.properties.location = "my_location' as x; DROP TABLE t; --".to_string();
    }
    let err = RelationalGenerator::new(IngestMode::BulkLoad(BulkLoad::default()), options(Dialect::Snowflake))
        .generate(&datasets)
        .unwrap_err();

    assert!(matches!(
        err,
        GeneratorError::Planner(PlannerError::InvalidIngestMode { ref field, .. })
            if field == "staging.properties.location"
    ));
}

#[test]
fn test_bulk_load_stage_reference_location() {
    let mut datasets = staged_files(FileFormat::Csv, csv_fields());
    if let milestone::planner::Staging::StagedFiles(files) = &mut datasets.staging {
        files.properties.location = "@my_db.my_schema.my_stage/landing/".to_string();
    }
    let result = generate(IngestMode::BulkLoad(BulkLoad::default()), &datasets);

    assert!(result.ingest[0]
        .contains("FROM @my_db.my_schema.my_stage/landing/ as legend_persistence_stage)"));
}

#[test]
fn test_bulk_load_rejects_format_option_key() {
    let mut datasets = staged_files(FileFormat::Csv, csv_fields());
    if let milestone::planner::Staging::StagedFiles(files) = &mut datasets.staging {
        files.properties.format_options = BTreeMap::from([(
            "skip_header = 1) ON_ERROR = ('CONTINUE".to_string(),
            "1".to_string(),
        )]);
    }
    let err = RelationalGenerator::new(IngestMode::BulkLoad(BulkLoad::default()), options(Dialect::Snowflake))
        .generate(&datasets)
        .unwrap_err();

    assert!(matches!(
        err,
        GeneratorError::Planner(PlannerError::InvalidIngestMode { ref field, .. })
            if field == "staging.properties.format_options"
    ));
}

#[test]
fn test_bulk_load_upper_case_folds_udf_name() {
    let mode = IngestMode::BulkLoad(BulkLoad {
        digest_generation: DigestGeneration::UdfBased {
            udf_name: "lakehouse_md5".to_string(),
            field: "digest".to_string(),
        },
        ..Default::default()
    });
    let result = RelationalGenerator::new(
        mode,
        options(Dialect::Snowflake).with_case_conversion(CaseConversion::Upper),
    )
    .generate(&staged_files(FileFormat::Csv, csv_fields()))
    .unwrap();

    assert!(result.ingest[0].starts_with(
        "COPY INTO \"MY_DB\".\"MY_NAME\" (\"COL_INT\", \"COL_STRING\", \"DIGEST\", \"BATCH_ID\")"
    ));
    assert!(result.ingest[0].contains("LAKEHOUSE_MD5(OBJECT_CONSTRUCT("));
    assert!(!result.ingest[0].contains("lakehouse_md5"));
}
