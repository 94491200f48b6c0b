#[path = "../common/mod.rs"]
mod common;

use common::{datasets, expand, generate, staging_fields, with_field};
use milestone::generator::RelationalGenerator;
use milestone::ingest_mode::{
    DataSplitRange, IngestMode, MergeStrategy, TransactionMilestoning, UnitemporalDelta,
};
use milestone::logical::{DataType, Field};
use milestone::planner::StatisticName;
use milestone::sql::Dialect;

const KEYS: &str = "((sink.\"id\" = stage.\"id\") AND (sink.\"name\" = stage.\"name\"))";

#[test]
fn test_unitemporal_delta_batch_id() {
    let mode = IngestMode::UnitemporalDelta(UnitemporalDelta::default());
    let result = generate(mode, Dialect::Ansi, &datasets(staging_fields()));

    assert_eq!(
        result.pre_actions[0],
        "CREATE TABLE IF NOT EXISTS \"mydb\".\"main\"(\"id\" INTEGER NOT NULL,\
         \"name\" VARCHAR NOT NULL,\"amount\" DOUBLE,\"biz_date\" DATE,\"digest\" VARCHAR,\
         \"batch_id_in\" INTEGER NOT NULL,\"batch_id_out\" INTEGER,\
         PRIMARY KEY (\"id\", \"name\", \"batch_id_in\"))"
    );
    assert_eq!(
        result.ingest[0],
        expand(&format!(
            "UPDATE \"mydb\".\"main\" as sink SET sink.\"batch_id_out\" = {{BID}}-1 \
             WHERE (sink.\"batch_id_out\" = 999999999) AND (EXISTS (SELECT * FROM \"mydb\".\"staging\" as stage \
             WHERE {} AND (sink.\"digest\" <> stage.\"digest\")))",
            KEYS
        ))
    );
    assert_eq!(
        result.ingest[1],
        expand(&format!(
            "INSERT INTO \"mydb\".\"main\" (\"id\", \"name\", \"amount\", \"biz_date\", \"digest\", \
             \"batch_id_in\", \"batch_id_out\") \
             (SELECT stage.\"id\",stage.\"name\",stage.\"amount\",stage.\"biz_date\",stage.\"digest\",\
             {{BID}},999999999 FROM \"mydb\".\"staging\" as stage \
             WHERE NOT (EXISTS (SELECT * FROM \"mydb\".\"main\" as sink \
             WHERE (sink.\"batch_id_out\" = 999999999) AND (sink.\"digest\" = stage.\"digest\") \
             AND {})))",
            KEYS
        ))
    );
}

#[test]
fn test_unitemporal_delta_statistics() {
    let mode = IngestMode::UnitemporalDelta(UnitemporalDelta::default());
    let result = generate(mode, Dialect::Ansi, &datasets(staging_fields()));
    let stats = &result.post_ingest_statistics;

    assert_eq!(
        stats[&StatisticName::RowsUpdated],
        expand(
            "SELECT COUNT(*) as \"rowsUpdated\" FROM \"mydb\".\"main\" as sink \
             WHERE sink.\"batch_id_out\" = {BID}-1"
        )
    );
    assert_eq!(
        stats[&StatisticName::RowsInserted],
        expand(
            "SELECT (SELECT COUNT(*) FROM \"mydb\".\"main\" as sink WHERE sink.\"batch_id_in\" = {BID})\
             -(SELECT COUNT(*) FROM \"mydb\".\"main\" as sink WHERE sink.\"batch_id_out\" = {BID}-1) \
             as \"rowsInserted\""
        )
    );
    assert_eq!(stats[&StatisticName::RowsDeleted], "SELECT 0 as \"rowsDeleted\"");
    assert_eq!(stats[&StatisticName::RowsTerminated], "SELECT 0 as \"rowsTerminated\"");
}

#[test]
fn test_unitemporal_delta_with_delete_indicator_and_splits() {
    let fields = with_field(
        with_field(
            staging_fields(),
            Field::new("delete_indicator", DataType::Varchar),
        ),
        Field::new("data_split", DataType::Bigint),
    );
    let mode = IngestMode::UnitemporalDelta(UnitemporalDelta {
        merge_strategy: MergeStrategy::delete_indicator("delete_indicator", &["yes", "1"]),
        data_split_field: Some("data_split".to_string()),
        ..Default::default()
    });
    let generator = RelationalGenerator::new(mode, common::options(Dialect::Ansi));
    let results = generator
        .generate_with_splits(
            &datasets(fields),
            &[DataSplitRange::new(1, 1), DataSplitRange::new(2, 3)],
        )
        .unwrap();
    assert_eq!(results.len(), 2);

    let result = &results[1];
    let split = "(stage.\"data_split\" >= 2) AND (stage.\"data_split\" <= 3)";
    assert!(!result.pre_actions[0].contains("data_split"));
    assert_eq!(
        result.ingest[0],
        expand(&format!(
            "UPDATE \"mydb\".\"main\" as sink SET sink.\"batch_id_out\" = {{BID}}-1 \
             WHERE (sink.\"batch_id_out\" = 999999999) AND (EXISTS (SELECT * FROM \"mydb\".\"staging\" as stage \
             WHERE ({split}) AND {keys} \
             AND ((sink.\"digest\" <> stage.\"digest\") OR (stage.\"delete_indicator\" IN ('yes','1')))))",
            split = split,
            keys = KEYS
        ))
    );
    assert_eq!(
        result.ingest[1],
        expand(&format!(
            "INSERT INTO \"mydb\".\"main\" (\"id\", \"name\", \"amount\", \"biz_date\", \"digest\", \
             \"batch_id_in\", \"batch_id_out\") \
             (SELECT stage.\"id\",stage.\"name\",stage.\"amount\",stage.\"biz_date\",stage.\"digest\",\
             {{BID}},999999999 FROM \"mydb\".\"staging\" as stage \
             WHERE ({split}) AND (NOT (EXISTS (SELECT * FROM \"mydb\".\"main\" as sink \
             WHERE (sink.\"batch_id_out\" = 999999999) AND (sink.\"digest\" = stage.\"digest\") \
             AND {keys}))) AND (stage.\"delete_indicator\" NOT IN ('yes','1')))",
            split = split,
            keys = KEYS
        ))
    );

    let updated = "(sink.\"batch_id_out\" = {BID}-1) AND (EXISTS (SELECT * FROM \"mydb\".\"main\" as sink2 \
        WHERE ((sink2.\"id\" = sink.\"id\") AND (sink2.\"name\" = sink.\"name\")) \
        AND (sink2.\"batch_id_in\" = {BID})))";
    let stats = &result.post_ingest_statistics;
    assert_eq!(
        stats[&StatisticName::IncomingRecordCount],
        format!(
            "SELECT COUNT(*) as \"incomingRecordCount\" FROM \"mydb\".\"staging\" as stage WHERE {}",
            split
        )
    );
    assert_eq!(
        stats[&StatisticName::RowsUpdated],
        expand(&format!(
            "SELECT COUNT(*) as \"rowsUpdated\" FROM \"mydb\".\"main\" as sink WHERE {}",
            updated
        ))
    );
    assert_eq!(
        stats[&StatisticName::RowsTerminated],
        expand(&format!(
            "SELECT (SELECT COUNT(*) FROM \"mydb\".\"main\" as sink WHERE sink.\"batch_id_out\" = {{BID}}-1)\
             -(SELECT COUNT(*) FROM \"mydb\".\"main\" as sink WHERE {}) as \"rowsTerminated\"",
            updated
        ))
    );
    assert_eq!(
        stats[&StatisticName::RowsDeleted].replace("rowsDeleted", "rowsTerminated"),
        stats[&StatisticName::RowsTerminated]
    );
}

#[test]
fn test_unitemporal_delta_date_time() {
    let mode = IngestMode::UnitemporalDelta(UnitemporalDelta {
        transaction_milestoning: TransactionMilestoning::date_time(),
        ..Default::default()
    });
    let result = generate(mode, Dialect::Ansi, &datasets(staging_fields()));

    assert!(result.pre_actions[0].contains(
        "\"batch_time_in\" DATETIME NOT NULL,\"batch_time_out\" DATETIME,\
         PRIMARY KEY (\"id\", \"name\", \"batch_time_in\")"
    ));
    assert_eq!(
        result.ingest[0],
        format!(
            "UPDATE \"mydb\".\"main\" as sink SET sink.\"batch_time_out\" = '2000-01-01 00:00:00.000000' \
             WHERE (sink.\"batch_time_out\" = '9999-12-31 23:59:59') AND (EXISTS (SELECT * FROM \"mydb\".\"staging\" as stage \
             WHERE {} AND (sink.\"digest\" <> stage.\"digest\")))",
            KEYS
        )
    );
    assert!(result.ingest[1].contains(
        "stage.\"digest\",'2000-01-01 00:00:00.000000','9999-12-31 23:59:59' FROM"
    ));
    assert_eq!(
        result.post_ingest_statistics[&StatisticName::RowsUpdated],
        "SELECT COUNT(*) as \"rowsUpdated\" FROM \"mydb\".\"main\" as sink \
         WHERE sink.\"batch_time_out\" = '2000-01-01 00:00:00.000000'"
    );
}

#[test]
fn test_unitemporal_delta_infinite_batch_id_is_configurable() {
    let mode = IngestMode::UnitemporalDelta(UnitemporalDelta::default());
    let planner = milestone::planner::PlannerOptions {
        infinite_batch_id: 42,
        ..Default::default()
    };
    let result = common::generate_with(mode, Dialect::Ansi, planner, &datasets(staging_fields()));

    assert!(result.ingest[0].contains("WHERE (sink.\"batch_id_out\" = 42) AND"));
    assert!(!result.ingest[1].contains("999999999"));
}
