#[path = "../common/mod.rs"]
mod common;

use common::{datasets, generate, staging_fields, with_field};
use milestone::generator::{CaseConversion, RelationalGenerator};
use milestone::ingest_mode::{
    Auditing, DataSplitRange, IngestMode, MergeStrategy, NontemporalDelta,
};
use milestone::logical::{DataType, Field};
use milestone::planner::StatisticName;
use milestone::sql::Dialect;

const UPDATE_SET: &str = "UPDATE SET sink.\"id\" = stage.\"id\",sink.\"name\" = stage.\"name\",\
    sink.\"amount\" = stage.\"amount\",sink.\"biz_date\" = stage.\"biz_date\",\
    sink.\"digest\" = stage.\"digest\"";

const INSERT_VALUES: &str = "INSERT (\"id\", \"name\", \"amount\", \"biz_date\", \"digest\") \
    VALUES (stage.\"id\",stage.\"name\",stage.\"amount\",stage.\"biz_date\",stage.\"digest\")";

fn with_delete_indicator() -> IngestMode {
    IngestMode::NontemporalDelta(NontemporalDelta {
        merge_strategy: MergeStrategy::delete_indicator("delete_indicator", &["yes", "1"]),
        ..Default::default()
    })
}

#[test]
fn test_nontemporal_delta_merge() {
    let mode = IngestMode::NontemporalDelta(NontemporalDelta::default());
    let result = generate(mode, Dialect::Snowflake, &datasets(staging_fields()));

    assert_eq!(result.ingest.len(), 1);
    insta::assert_snapshot!(&result.ingest[0], @r#"MERGE INTO "mydb"."main" as sink USING "mydb"."staging" as stage ON (sink."id" = stage."id") AND (sink."name" = stage."name") WHEN MATCHED AND sink."digest" <> stage."digest" THEN UPDATE SET sink."id" = stage."id",sink."name" = stage."name",sink."amount" = stage."amount",sink."biz_date" = stage."biz_date",sink."digest" = stage."digest" WHEN NOT MATCHED THEN INSERT ("id", "name", "amount", "biz_date", "digest") VALUES (stage."id",stage."name",stage."amount",stage."biz_date",stage."digest")"#);
}

#[test]
fn test_metadata_uses_variant() {
    let mode = IngestMode::NontemporalDelta(NontemporalDelta::default());
    let result = generate(mode, Dialect::Snowflake, &datasets(staging_fields()));

    assert!(result.pre_actions[1].ends_with("\"staging_filters\" VARIANT)"));
}

#[test]
fn test_merge_with_delete_indicator() {
    let fields = with_field(
        staging_fields(),
        Field::new("delete_indicator", DataType::Varchar),
    );
    let result = generate(with_delete_indicator(), Dialect::Snowflake, &datasets(fields));

    assert_eq!(
        result.ingest[0],
        format!(
            "MERGE INTO \"mydb\".\"main\" as sink USING \"mydb\".\"staging\" as stage \
             ON (sink.\"id\" = stage.\"id\") AND (sink.\"name\" = stage.\"name\") \
             WHEN MATCHED AND stage.\"delete_indicator\" IN ('yes','1') THEN DELETE \
             WHEN MATCHED AND (sink.\"digest\" <> stage.\"digest\") \
             AND (stage.\"delete_indicator\" NOT IN ('yes','1')) THEN {} \
             WHEN NOT MATCHED AND stage.\"delete_indicator\" NOT IN ('yes','1') THEN {}",
            UPDATE_SET, INSERT_VALUES
        )
    );
}

#[test]
fn test_merge_with_data_split() {
    let fields = with_field(
        with_field(
            staging_fields(),
            Field::new("delete_indicator", DataType::Varchar),
        ),
        Field::new("data_split", DataType::Bigint),
    );
    let mode = IngestMode::NontemporalDelta(NontemporalDelta {
        merge_strategy: MergeStrategy::delete_indicator("delete_indicator", &["yes", "1"]),
        data_split_field: Some("data_split".to_string()),
        ..Default::default()
    });
    let results = RelationalGenerator::new(mode, common::options(Dialect::Snowflake))
        .generate_with_splits(&datasets(fields), &[DataSplitRange::new(1, 1)])
        .unwrap();

    assert!(results[0].ingest[0].starts_with(
        "MERGE INTO \"mydb\".\"main\" as sink USING (SELECT stage.\"id\",stage.\"name\",\
         stage.\"amount\",stage.\"biz_date\",stage.\"digest\",stage.\"delete_indicator\" \
         FROM \"mydb\".\"staging\" as stage \
         WHERE (stage.\"data_split\" >= 1) AND (stage.\"data_split\" <= 1)) as stage \
         ON (sink.\"id\" = stage.\"id\") AND (sink.\"name\" = stage.\"name\") WHEN MATCHED"
    ));
    assert_eq!(
        results[0].pre_ingest_statistics[&StatisticName::RowsDeleted],
        "SELECT COUNT(*) as \"rowsDeleted\" FROM \"mydb\".\"main\" as sink WHERE EXISTS \
         (SELECT stage.\"id\",stage.\"name\",stage.\"amount\",stage.\"biz_date\",stage.\"digest\" \
         FROM \"mydb\".\"staging\" as stage \
         WHERE ((stage.\"data_split\" >= 1) AND (stage.\"data_split\" <= 1)) \
         AND ((sink.\"id\" = stage.\"id\") AND (sink.\"name\" = stage.\"name\")) \
         AND (stage.\"delete_indicator\" IN ('yes','1')))"
    );
}

#[test]
fn test_merge_with_auditing() {
    let mode = IngestMode::NontemporalDelta(NontemporalDelta {
        auditing: Auditing::date_time("batch_update_time"),
        ..Default::default()
    });
    let result = generate(mode, Dialect::Snowflake, &datasets(staging_fields()));

    assert!(result.pre_actions[0].contains(",\"batch_update_time\" DATETIME,PRIMARY KEY"));
    assert!(result.ingest[0].contains(
        "sink.\"digest\" = stage.\"digest\",sink.\"batch_update_time\" = '2000-01-01 00:00:00.000000' \
         WHEN NOT MATCHED THEN INSERT (\"id\", \"name\", \"amount\", \"biz_date\", \"digest\", \"batch_update_time\") \
         VALUES (stage.\"id\",stage.\"name\",stage.\"amount\",stage.\"biz_date\",stage.\"digest\",\
         '2000-01-01 00:00:00.000000')"
    ));
}

#[test]
fn test_merge_upper_case() {
    let mode = IngestMode::NontemporalDelta(NontemporalDelta::default());
    let result = RelationalGenerator::new(
        mode,
        common::options(Dialect::Snowflake).with_case_conversion(CaseConversion::Upper),
    )
    .generate(&datasets(staging_fields()))
    .unwrap();

    assert!(result.ingest[0].starts_with(
        "MERGE INTO \"MYDB\".\"MAIN\" as sink USING \"MYDB\".\"STAGING\" as stage \
         ON (sink.\"ID\" = stage.\"ID\") AND (sink.\"NAME\" = stage.\"NAME\")"
    ));
    assert!(result.metadata_ingest[0].starts_with(
        "INSERT INTO BATCH_METADATA (\"TABLE_NAME\", \"TABLE_BATCH_ID\""
    ));
}

#[test]
fn test_merge_with_data_split_upper_case_keeps_stage_alias() {
    let fields = with_field(staging_fields(), Field::new("data_split", DataType::Bigint));
    let mode = IngestMode::NontemporalDelta(NontemporalDelta {
        data_split_field: Some("data_split".to_string()),
        ..Default::default()
    });
    let results = RelationalGenerator::new(
        mode,
        common::options(Dialect::Snowflake).with_case_conversion(CaseConversion::Upper),
    )
    .generate_with_splits(&datasets(fields), &[DataSplitRange::new(1, 1)])
    .unwrap();

    let merge = &results[0].ingest[0];
    assert!(merge.contains(
        "WHERE (stage.\"DATA_SPLIT\" >= 1) AND (stage.\"DATA_SPLIT\" <= 1)) as stage \
         ON (sink.\"ID\" = stage.\"ID\")"
    ));
    assert!(!merge.contains("STAGE"));
}
