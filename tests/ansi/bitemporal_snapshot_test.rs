#[path = "../common/mod.rs"]
mod common;

use common::{datasets, expand, generate};
use milestone::generator::{GeneratorError, RelationalGenerator};
use milestone::ingest_mode::{BitemporalSnapshot, IngestMode, TransactionMilestoning};
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
fn test_bitemporal_snapshot_batch_id() {
    let mode = IngestMode::BitemporalSnapshot(BitemporalSnapshot::default());
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
        result.ingest,
        vec![
            expand(
                "UPDATE \"mydb\".\"main\" as sink SET sink.\"batch_id_out\" = {BID}-1 \
                 WHERE (sink.\"batch_id_out\" = 999999999) AND (NOT (EXISTS (SELECT * FROM \"mydb\".\"staging\" as stage \
                 WHERE (((sink.\"id\" = stage.\"id\") AND (sink.\"name\" = stage.\"name\")) \
                 AND (sink.\"validity_from_target\" = stage.\"validity_from_reference\") \
                 AND (sink.\"validity_through_target\" = stage.\"validity_through_reference\")) \
                 AND (sink.\"digest\" = stage.\"digest\"))))"
            ),
            expand(
                "INSERT INTO \"mydb\".\"main\" (\"id\", \"name\", \"amount\", \"validity_from_target\", \
                 \"validity_through_target\", \"digest\", \"batch_id_in\", \"batch_id_out\") \
                 (SELECT stage.\"id\",stage.\"name\",stage.\"amount\",stage.\"validity_from_reference\",\
                 stage.\"validity_through_reference\",stage.\"digest\",{BID},999999999 \
                 FROM \"mydb\".\"staging\" as stage \
                 WHERE NOT (stage.\"digest\" IN (SELECT sink.\"digest\" FROM \"mydb\".\"main\" as sink \
                 WHERE sink.\"batch_id_out\" = 999999999)))"
            ),
        ]
    );
}

#[test]
fn test_bitemporal_snapshot_statistics_key_on_validity() {
    let mode = IngestMode::BitemporalSnapshot(BitemporalSnapshot::default());
    let result = generate(mode, Dialect::Ansi, &datasets(bitemporal_staging()));
    let stats = &result.post_ingest_statistics;

    assert_eq!(
        stats[&StatisticName::RowsUpdated],
        expand(
            "SELECT COUNT(*) as \"rowsUpdated\" FROM \"mydb\".\"main\" as sink \
             WHERE (sink.\"batch_id_out\" = {BID}-1) AND (EXISTS (SELECT * FROM \"mydb\".\"main\" as sink2 \
             WHERE ((sink2.\"id\" = sink.\"id\") AND (sink2.\"name\" = sink.\"name\") \
             AND (sink2.\"validity_from_target\" = sink.\"validity_from_target\")) \
             AND (sink2.\"batch_id_in\" = {BID})))"
        )
    );
    assert_eq!(stats[&StatisticName::RowsDeleted], "SELECT 0 as \"rowsDeleted\"");
    assert!(stats[&StatisticName::RowsTerminated].starts_with("SELECT (SELECT COUNT(*)"));
}

#[test]
fn test_bitemporal_snapshot_date_time() {
    let mode = IngestMode::BitemporalSnapshot(BitemporalSnapshot {
        transaction_milestoning: TransactionMilestoning::date_time(),
        ..Default::default()
    });
    let result = generate(mode, Dialect::Ansi, &datasets(bitemporal_staging()));

    assert!(result.ingest[0].starts_with(
        "UPDATE \"mydb\".\"main\" as sink SET sink.\"batch_time_out\" = '2000-01-01 00:00:00.000000' \
         WHERE (sink.\"batch_time_out\" = '9999-12-31 23:59:59') AND (NOT (EXISTS"
    ));
    assert!(result.ingest[1].ends_with(
        "WHERE NOT (stage.\"digest\" IN (SELECT sink.\"digest\" FROM \"mydb\".\"main\" as sink \
         WHERE sink.\"batch_time_out\" = '9999-12-31 23:59:59')))"
    ));
}

#[test]
fn test_bitemporal_snapshot_needs_validity_columns() {
    let fields = vec![
        Field::new("id", DataType::Int).primary_key(),
        Field::new("amount", DataType::Double),
        Field::new("digest", DataType::Varchar),
    ];
    let mode = IngestMode::BitemporalSnapshot(BitemporalSnapshot::default());
    let err = RelationalGenerator::new(mode, common::options(Dialect::Ansi))
        .generate(&datasets(fields))
        .unwrap_err();

    assert!(matches!(
        err,
        GeneratorError::Planner(PlannerError::MissingField { .. })
    ));
}
