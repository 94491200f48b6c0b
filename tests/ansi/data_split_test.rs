#[path = "../common/mod.rs"]
mod common;

use common::{datasets, expand, options, staging_fields, with_field};
use milestone::generator::{GeneratorError, RelationalGenerator};
use milestone::ingest_mode::{AppendOnly, DataSplitRange, IngestMode, Overwrite};
use milestone::logical::{DataType, Field};
use milestone::planner::StatisticName;
use milestone::sql::Dialect;

fn split_fields() -> Vec<Field> {
    with_field(staging_fields(), Field::new("data_split", DataType::Bigint))
}

fn append_only_with_splits() -> RelationalGenerator {
    let mode = IngestMode::AppendOnly(AppendOnly {
        data_split_field: Some("data_split".to_string()),
        ..Default::default()
    });
    RelationalGenerator::new(mode, options(Dialect::Ansi))
}

#[test]
fn test_placeholders_without_ranges() {
    let result = append_only_with_splits()
        .generate(&datasets(split_fields()))
        .unwrap();

    assert!(result.ingest[0].ends_with(
        "FROM \"mydb\".\"staging\" as stage \
         WHERE (stage.\"data_split\" >= '{DATA_SPLIT_LOWER_BOUND_PLACEHOLDER}') \
         AND (stage.\"data_split\" <= '{DATA_SPLIT_UPPER_BOUND_PLACEHOLDER}'))"
    ));
}

#[test]
fn test_one_result_per_range() {
    let results = append_only_with_splits()
        .generate_with_splits(
            &datasets(split_fields()),
            &[DataSplitRange::new(1, 1), DataSplitRange::new(2, 3)],
        )
        .unwrap();

    assert_eq!(results.len(), 2);
    // The split column is not carried into main.
    assert!(!results[0].pre_actions[0].contains("data_split"));
    assert_eq!(
        results[0].ingest[0],
        expand(
            "INSERT INTO \"mydb\".\"main\" (\"id\", \"name\", \"amount\", \"biz_date\", \"digest\", \"batch_id\") \
             (SELECT stage.\"id\",stage.\"name\",stage.\"amount\",stage.\"biz_date\",stage.\"digest\",{BID} \
             FROM \"mydb\".\"staging\" as stage \
             WHERE (stage.\"data_split\" >= 1) AND (stage.\"data_split\" <= 1))"
        )
    );
    assert_eq!(
        results[1].post_ingest_statistics[&StatisticName::IncomingRecordCount],
        "SELECT COUNT(*) as \"incomingRecordCount\" FROM \"mydb\".\"staging\" as stage \
         WHERE (stage.\"data_split\" >= 2) AND (stage.\"data_split\" <= 3)"
    );
    assert_eq!(results[0].metadata_ingest, results[1].metadata_ingest);
}

#[test]
fn test_gaps_between_ranges_are_rejected() {
    let err = append_only_with_splits()
        .generate_with_splits(
            &datasets(split_fields()),
            &[DataSplitRange::new(1, 1), DataSplitRange::new(3, 4)],
        )
        .unwrap_err();

    assert!(matches!(err, GeneratorError::InvalidDataSplits(_)));
}

#[test]
fn test_inverted_range_is_rejected() {
    let err = append_only_with_splits()
        .generate_with_splits(&datasets(split_fields()), &[DataSplitRange::new(5, 2)])
        .unwrap_err();

    assert!(matches!(err, GeneratorError::InvalidDataSplits(_)));
}

#[test]
fn test_range_ending_at_max_has_no_successor() {
    let err = append_only_with_splits()
        .generate_with_splits(
            &datasets(split_fields()),
            &[DataSplitRange::new(1, i64::MAX), DataSplitRange::new(i64::MIN, 0)],
        )
        .unwrap_err();

    assert!(matches!(err, GeneratorError::InvalidDataSplits(_)));
}

#[test]
fn test_mode_without_split_field_is_rejected() {
    let generator =
        RelationalGenerator::new(IngestMode::Overwrite(Overwrite::default()), options(Dialect::Ansi));
    let err = generator
        .generate_with_splits(&datasets(split_fields()), &[DataSplitRange::new(1, 1)])
        .unwrap_err();

    assert!(matches!(err, GeneratorError::InvalidDataSplits(_)));
}

#[test]
fn test_split_column_must_exist() {
    let err = append_only_with_splits()
        .generate(&datasets(staging_fields()))
        .unwrap_err();

    assert!(matches!(err, GeneratorError::Planner(_)));
}
