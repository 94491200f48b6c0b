#[path = "../common/mod.rs"]
mod common;

use common::{datasets, expand, generate, with_field};
use milestone::generator::{GeneratorError, RelationalGenerator};
use milestone::ingest_mode::{BitemporalDelta, DataSplitRange, IngestMode, MergeStrategy};
use milestone::logical::{DataType, Field};
use milestone::planner::{PlannerError, StatisticName};
use milestone::sql::Dialect;

fn bitemporal_staging() -> Vec<Field> {
    vec![
        Field::new("id", DataType::Int).primary_key(),
        Field::new("name", DataType::Varchar).primary_key(),
        Field::new("amount", DataType::Double),
        Field::new("validity_from_reference", DataType::Datetime).primary_key(),
        Field::new("validity_through_reference", DataType::Datetime),
        Field::new("digest", DataType::Varchar),
    ]
}

#[test]
fn test_bitemporal_delta_from_and_through() {
    let mode = IngestMode::BitemporalDelta(BitemporalDelta::default());
    let result = generate(mode, Dialect::Ansi, &datasets(bitemporal_staging()));

    assert_eq!(
        result.pre_actions[0],
        "CREATE TABLE IF NOT EXISTS \"mydb\".\"main\"(\"id\" INTEGER NOT NULL,\
         \"name\" VARCHAR NOT NULL,\"amount\" DOUBLE,\"validity_from_target\" DATETIME NOT NULL,\
         \"validity_through_target\" DATETIME,\"digest\" VARCHAR,\
         \"batch_id_in\" INTEGER NOT NULL,\"batch_id_out\" INTEGER,\
         PRIMARY KEY (\"id\", \"name\", \"validity_from_target\", \"batch_id_in\"))"
    );
    assert_eq!(
        result.ingest[0],
        expand(
            "UPDATE \"mydb\".\"main\" as sink SET sink.\"batch_id_out\" = {BID}-1 \
             WHERE (sink.\"batch_id_out\" = 999999999) AND (EXISTS (SELECT * FROM \"mydb\".\"staging\" as stage \
             WHERE ((sink.\"id\" = stage.\"id\") AND (sink.\"name\" = stage.\"name\")) \
             AND (sink.\"validity_from_target\" = stage.\"validity_from_reference\") \
             AND (sink.\"digest\" <> stage.\"digest\")))"
        )
    );
    assert_eq!(
        result.ingest[1],
        expand(
            "INSERT INTO \"mydb\".\"main\" (\"id\", \"name\", \"amount\", \"validity_from_target\", \
             \"validity_through_target\", \"digest\", \"batch_id_in\", \"batch_id_out\") \
             (SELECT stage.\"id\",stage.\"name\",stage.\"amount\",stage.\"validity_from_reference\",\
             stage.\"validity_through_reference\",stage.\"digest\",{BID},999999999 \
             FROM \"mydb\".\"staging\" as stage \
             WHERE NOT (EXISTS (SELECT * FROM \"mydb\".\"main\" as sink \
             WHERE (sink.\"batch_id_out\" = 999999999) AND (sink.\"digest\" = stage.\"digest\") \
             AND ((sink.\"id\" = stage.\"id\") AND (sink.\"name\" = stage.\"name\")) \
             AND (sink.\"validity_from_target\" = stage.\"validity_from_reference\"))))"
        )
    );
    assert_eq!(
        result.post_ingest_statistics[&StatisticName::RowsTerminated],
        "SELECT 0 as \"rowsTerminated\""
    );
}

#[test]
fn test_bitemporal_delta_with_delete_indicator() {
    let fields = with_field(
        bitemporal_staging(),
        Field::new("delete_indicator", DataType::Varchar),
    );
    let mode = IngestMode::BitemporalDelta(BitemporalDelta {
        merge_strategy: MergeStrategy::delete_indicator("delete_indicator", &["yes"]),
        ..Default::default()
    });
    let result = generate(mode, Dialect::Ansi, &datasets(fields));

    assert!(result.ingest[0].ends_with(
        "AND ((sink.\"digest\" <> stage.\"digest\") OR (stage.\"delete_indicator\" IN ('yes')))))"
    ));
    assert!(result.ingest[1].ends_with("AND (stage.\"delete_indicator\" NOT IN ('yes')))"));
    assert_eq!(
        result.post_ingest_statistics[&StatisticName::RowsUpdated],
        expand(
            "SELECT COUNT(*) as \"rowsUpdated\" FROM \"mydb\".\"main\" as sink \
             WHERE (sink.\"batch_id_out\" = {BID}-1) AND (EXISTS (SELECT * FROM \"mydb\".\"main\" as sink2 \
             WHERE ((sink2.\"id\" = sink.\"id\") AND (sink2.\"name\" = sink.\"name\") \
             AND (sink2.\"validity_from_target\" = sink.\"validity_from_target\")) \
             AND (sink2.\"batch_id_in\" = {BID})))"
        )
    );
}

#[test]
fn test_bitemporal_delta_with_data_splits() {
    let fields = with_field(
        bitemporal_staging(),
        Field::new("data_split", DataType::Bigint),
    );
    let mode = IngestMode::BitemporalDelta(BitemporalDelta {
        data_split_field: Some("data_split".to_string()),
        ..Default::default()
    });
    let results = RelationalGenerator::new(mode, common::options(Dialect::Ansi))
        .generate_with_splits(
            &datasets(fields),
            &[DataSplitRange::new(1, 1), DataSplitRange::new(2, 3)],
        )
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(!results[0].pre_actions[0].contains("data_split"));
    let first = "(stage.\"data_split\" >= 1) AND (stage.\"data_split\" <= 1)";
    let second = "(stage.\"data_split\" >= 2) AND (stage.\"data_split\" <= 3)";
    for statement in &results[0].ingest {
        assert!(statement.contains(first), "{}", statement);
        assert!(!statement.contains(second), "{}", statement);
    }
    for statement in &results[1].ingest {
        assert!(statement.contains(second), "{}", statement);
    }
    assert!(results[0].ingest[0].starts_with("UPDATE \"mydb\".\"main\" as sink"));
    assert!(results[0].ingest[1].starts_with("INSERT INTO \"mydb\".\"main\""));
    assert!(results[1].ingest[1].ends_with(
        "WHERE ((stage.\"data_split\" >= 2) AND (stage.\"data_split\" <= 3)) \
         AND (NOT (EXISTS (SELECT * FROM \"mydb\".\"main\" as sink \
         WHERE (sink.\"batch_id_out\" = 999999999) AND (sink.\"digest\" = stage.\"digest\") \
         AND ((sink.\"id\" = stage.\"id\") AND (sink.\"name\" = stage.\"name\")) \
         AND (sink.\"validity_from_target\" = stage.\"validity_from_reference\")))))"
    ));
    assert_eq!(results[0].metadata_ingest, results[1].metadata_ingest);
}

#[test]
fn test_bitemporal_delta_source_from_only_is_unknown() {
    let err = toml::from_str::<IngestMode>(
        r#"
        mode = "bitemporal_delta"

        [validity_milestoning]
        kind = "source_specifies_from"
        "#,
    )
    .unwrap_err();

    assert!(err.to_string().contains("unknown variant"));
}

#[test]
fn test_bitemporal_delta_needs_validity_columns() {
    let fields = vec![
        Field::new("id", DataType::Int).primary_key(),
        Field::new("amount", DataType::Double),
        Field::new("digest", DataType::Varchar),
    ];
    let mode = IngestMode::BitemporalDelta(BitemporalDelta::default());
    let err = RelationalGenerator::new(mode, common::options(Dialect::Ansi))
        .generate(&datasets(fields))
        .unwrap_err();

    assert!(matches!(
        err,
        GeneratorError::Planner(PlannerError::MissingField { .. })
    ));
}
