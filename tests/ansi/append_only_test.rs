#[path = "../common/mod.rs"]
mod common;

use common::{datasets, expand, generate, generate_with, options, staging_fields, BID, METADATA_CREATE};
use milestone::generator::{CaseConversion, RelationalGenerator};
use milestone::ingest_mode::{AppendOnly, Auditing, IngestMode};
use milestone::planner::{PlannerOptions, StatisticName};
use milestone::sql::Dialect;

fn append_only() -> IngestMode {
    IngestMode::AppendOnly(AppendOnly::default())
}

#[test]
fn test_append_only_default() {
    let result = generate(append_only(), Dialect::Ansi, &datasets(staging_fields()));

    assert_eq!(
        result.pre_actions,
        vec![
            "CREATE TABLE IF NOT EXISTS \"mydb\".\"main\"(\"id\" INTEGER NOT NULL,\
             \"name\" VARCHAR NOT NULL,\"amount\" DOUBLE,\"biz_date\" DATE,\"digest\" VARCHAR,\
             \"batch_id\" INTEGER,PRIMARY KEY (\"id\", \"name\"))"
                .to_string(),
            METADATA_CREATE.to_string(),
        ]
    );
    assert_eq!(
        result.ingest,
        vec![expand(
            "INSERT INTO \"mydb\".\"main\" (\"id\", \"name\", \"amount\", \"biz_date\", \"digest\", \"batch_id\") \
             (SELECT stage.\"id\",stage.\"name\",stage.\"amount\",stage.\"biz_date\",stage.\"digest\",{BID} \
             FROM \"mydb\".\"staging\" as stage)"
        )]
    );
    assert_eq!(
        result.metadata_ingest,
        vec![expand(
            "INSERT INTO batch_metadata (\"table_name\", \"table_batch_id\", \"batch_start_ts_utc\", \
             \"batch_end_ts_utc\", \"batch_status\") \
             (SELECT 'main',{BID},'2000-01-01 00:00:00.000000',CURRENT_TIMESTAMP(),'DONE')"
        )]
    );
    assert!(result.initialize_lock.is_empty());
    assert!(result.acquire_lock.is_empty());
    assert!(result.post_cleanup.is_empty());
}

#[test]
fn test_append_only_statistics() {
    let result = generate(append_only(), Dialect::Ansi, &datasets(staging_fields()));
    let stats = &result.post_ingest_statistics;

    assert!(result.pre_ingest_statistics.is_empty());
    assert_eq!(
        stats[&StatisticName::IncomingRecordCount],
        "SELECT COUNT(*) as \"incomingRecordCount\" FROM \"mydb\".\"staging\" as stage"
    );
    assert_eq!(
        stats[&StatisticName::RowsInserted],
        format!(
            "SELECT COUNT(*) as \"rowsInserted\" FROM \"mydb\".\"main\" as sink WHERE sink.\"batch_id\" = {}",
            BID
        )
    );
    assert_eq!(stats[&StatisticName::RowsUpdated], "SELECT 0 as \"rowsUpdated\"");
    assert_eq!(stats[&StatisticName::RowsDeleted], "SELECT 0 as \"rowsDeleted\"");
    assert_eq!(stats[&StatisticName::RowsTerminated], "SELECT 0 as \"rowsTerminated\"");
}

#[test]
fn test_append_only_with_auditing_filters_existing_records() {
    let mode = IngestMode::AppendOnly(AppendOnly {
        auditing: Auditing::date_time("batch_update_time"),
        filter_existing_records: true,
        ..Default::default()
    });
    let result = generate(mode, Dialect::Ansi, &datasets(staging_fields()));

    assert_eq!(
        result.pre_actions[0],
        "CREATE TABLE IF NOT EXISTS \"mydb\".\"main\"(\"id\" INTEGER NOT NULL,\
         \"name\" VARCHAR NOT NULL,\"amount\" DOUBLE,\"biz_date\" DATE,\"digest\" VARCHAR,\
         \"batch_update_time\" DATETIME NOT NULL,\"batch_id\" INTEGER,\
         PRIMARY KEY (\"id\", \"name\", \"batch_update_time\"))"
    );
    assert_eq!(
        result.ingest[0],
        expand(
            "INSERT INTO \"mydb\".\"main\" (\"id\", \"name\", \"amount\", \"biz_date\", \"digest\", \
             \"batch_update_time\", \"batch_id\") \
             (SELECT stage.\"id\",stage.\"name\",stage.\"amount\",stage.\"biz_date\",stage.\"digest\",\
             '2000-01-01 00:00:00.000000',{BID} FROM \"mydb\".\"staging\" as stage \
             WHERE NOT (EXISTS (SELECT * FROM \"mydb\".\"main\" as sink \
             WHERE ((sink.\"id\" = stage.\"id\") AND (sink.\"name\" = stage.\"name\")) \
             AND (sink.\"digest\" = stage.\"digest\"))))"
        )
    );
}

#[test]
fn test_append_only_upper_case() {
    let generator = RelationalGenerator::new(
        append_only(),
        options(Dialect::Ansi).with_case_conversion(CaseConversion::Upper),
    );
    let result = generator.generate(&datasets(staging_fields())).unwrap();

    assert_eq!(
        result.ingest[0],
        "INSERT INTO \"MYDB\".\"MAIN\" (\"ID\", \"NAME\", \"AMOUNT\", \"BIZ_DATE\", \"DIGEST\", \"BATCH_ID\") \
         (SELECT stage.\"ID\",stage.\"NAME\",stage.\"AMOUNT\",stage.\"BIZ_DATE\",stage.\"DIGEST\",\
         (SELECT COALESCE(MAX(BATCH_METADATA.\"TABLE_BATCH_ID\"),0)+1 FROM BATCH_METADATA as BATCH_METADATA \
         WHERE UPPER(BATCH_METADATA.\"TABLE_NAME\") = 'MAIN') \
         FROM \"MYDB\".\"STAGING\" as stage)"
    );
    assert_eq!(
        result.post_ingest_statistics[&StatisticName::IncomingRecordCount],
        "SELECT COUNT(*) as \"INCOMINGRECORDCOUNT\" FROM \"MYDB\".\"STAGING\" as stage"
    );
}

#[test]
fn test_append_only_concurrent_safety_and_cleanup() {
    let planner = PlannerOptions {
        enable_concurrent_safety: true,
        cleanup_staging_data: true,
        ..Default::default()
    };
    let result = generate_with(append_only(), Dialect::Ansi, planner, &datasets(staging_fields()));

    assert_eq!(result.pre_actions.len(), 3);
    assert_eq!(
        result.pre_actions[2],
        "CREATE TABLE IF NOT EXISTS \"mydb\".\"main_legend_persistence_lock\"\
         (\"insert_ts_utc\" DATETIME,\"last_used_ts_utc\" DATETIME,\"table_name\" VARCHAR UNIQUE)"
    );
    assert_eq!(
        result.initialize_lock,
        vec![
            "INSERT INTO \"mydb\".\"main_legend_persistence_lock\" (\"insert_ts_utc\", \"table_name\") \
             (SELECT '2000-01-01 00:00:00.000000','main' WHERE NOT (EXISTS \
             (SELECT * FROM \"mydb\".\"main_legend_persistence_lock\" as main_legend_persistence_lock)))"
                .to_string()
        ]
    );
    assert_eq!(
        result.acquire_lock,
        vec![
            "UPDATE \"mydb\".\"main_legend_persistence_lock\" as main_legend_persistence_lock \
             SET main_legend_persistence_lock.\"last_used_ts_utc\" = '2000-01-01 00:00:00.000000'"
                .to_string()
        ]
    );
    assert_eq!(
        result.post_cleanup,
        vec!["DELETE FROM \"mydb\".\"staging\" as stage".to_string()]
    );
}

#[test]
fn test_append_only_create_staging_dataset() {
    let planner = PlannerOptions {
        create_staging_dataset: true,
        cleanup_staging_data: true,
        ..Default::default()
    };
    let result = generate_with(append_only(), Dialect::Ansi, planner, &datasets(staging_fields()));

    assert_eq!(
        result.pre_actions[1],
        "CREATE TABLE IF NOT EXISTS \"mydb\".\"staging\"(\"id\" INTEGER NOT NULL,\
         \"name\" VARCHAR NOT NULL,\"amount\" DOUBLE,\"biz_date\" DATE,\"digest\" VARCHAR,\
         PRIMARY KEY (\"id\", \"name\"))"
    );
    assert_eq!(result.pre_actions[2], METADATA_CREATE);
    assert_eq!(
        result.post_cleanup,
        vec!["DROP TABLE IF EXISTS \"mydb\".\"staging\" CASCADE".to_string()]
    );
}

#[test]
fn test_append_only_batch_status_is_configurable() {
    let planner = PlannerOptions {
        batch_success_status: "SUCCEEDED".to_string(),
        collect_statistics: false,
        ..Default::default()
    };
    let result = generate_with(append_only(), Dialect::Ansi, planner, &datasets(staging_fields()));

    assert!(result.metadata_ingest[0].ends_with(",CURRENT_TIMESTAMP(),'SUCCEEDED')"));
    assert!(result.post_ingest_statistics.is_empty());
}
