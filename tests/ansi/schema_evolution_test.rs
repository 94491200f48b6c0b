#[path = "../common/mod.rs"]
mod common;

use common::{datasets_with_main, options, METADATA_CREATE};
use milestone::generator::{GeneratorError, RelationalGenerator};
use milestone::ingest_mode::{AppendOnly, IngestMode, UnitemporalDelta};
use milestone::logical::{DataType, Field, FieldType};
use milestone::planner::{PlannerError, PlannerOptions};
use milestone::sql::{Capability, CapabilitySet, Dialect};

fn evolving() -> PlannerOptions {
    PlannerOptions {
        enable_schema_evolution: true,
        ..Default::default()
    }
}

fn decimal(length: u32, scale: u32) -> FieldType {
    FieldType::of(DataType::Decimal)
        .with_length(length)
        .with_scale(scale)
}

fn main_fields() -> Vec<Field> {
    vec![
        Field::new("id", DataType::Int).primary_key(),
        Field::new("name", DataType::Varchar).primary_key(),
        Field::new("amount", decimal(10, 2)),
        Field::new("digest", DataType::Varchar).not_null(),
        Field::new("batch_id", DataType::Integer),
    ]
}

fn staging_fields() -> Vec<Field> {
    vec![
        Field::new("id", DataType::Int).primary_key(),
        Field::new("name", DataType::Varchar).primary_key(),
        Field::new("amount", decimal(12, 2)),
        Field::new("biz_date", DataType::Date),
        Field::new("digest", DataType::Varchar),
    ]
}

fn generate(
    mode: IngestMode,
    dialect: Dialect,
    main: Vec<Field>,
    staging: Vec<Field>,
) -> Result<Vec<String>, GeneratorError> {
    RelationalGenerator::new(mode, options(dialect).with_planner_options(evolving()))
        .generate(&datasets_with_main(main, staging))
        .map(|result| result.pre_actions)
}

#[test]
fn test_alters_follow_create_and_metadata() {
    let mode = IngestMode::AppendOnly(AppendOnly::default());
    let pre_actions = generate(mode, Dialect::Ansi, main_fields(), staging_fields()).unwrap();

    assert_eq!(
        pre_actions,
        vec![
            "CREATE TABLE IF NOT EXISTS \"mydb\".\"main\"(\"id\" INTEGER NOT NULL,\
             \"name\" VARCHAR NOT NULL,\"amount\" DECIMAL(10,2),\"digest\" VARCHAR NOT NULL,\
             \"batch_id\" INTEGER,PRIMARY KEY (\"id\", \"name\"))"
                .to_string(),
            METADATA_CREATE.to_string(),
            "ALTER TABLE \"mydb\".\"main\" ALTER COLUMN \"amount\" DECIMAL(12,2)".to_string(),
            "ALTER TABLE \"mydb\".\"main\" ADD COLUMN \"biz_date\" DATE".to_string(),
            "ALTER TABLE \"mydb\".\"main\" ALTER COLUMN \"digest\" DROP NOT NULL".to_string(),
        ]
    );
}

#[test]
fn test_snowflake_sets_data_type() {
    let mode = IngestMode::AppendOnly(AppendOnly::default());
    let pre_actions = generate(mode, Dialect::Snowflake, main_fields(), staging_fields()).unwrap();

    assert_eq!(
        pre_actions[2],
        "ALTER TABLE \"mydb\".\"main\" ALTER COLUMN \"amount\" SET DATA TYPE DECIMAL(12,2)"
    );
    assert_eq!(
        pre_actions[4],
        "ALTER TABLE \"mydb\".\"main\" ALTER COLUMN \"digest\" DROP NOT NULL"
    );
}

#[test]
fn test_explicit_conversion() {
    let main = vec![
        Field::new("id", DataType::Int).primary_key(),
        Field::new("amount", DataType::Double),
        Field::new("digest", DataType::Varchar),
    ];
    let staging = vec![
        Field::new("id", DataType::Int).primary_key(),
        Field::new("amount", DataType::Int),
        Field::new("digest", DataType::Varchar),
    ];
    let mode = IngestMode::UnitemporalDelta(UnitemporalDelta::default());
    let pre_actions = generate(mode, Dialect::Ansi, main, staging).unwrap();

    // The milestoning columns appended to main are not compared.
    assert_eq!(pre_actions.len(), 3);
    assert_eq!(
        pre_actions[2],
        "ALTER TABLE \"mydb\".\"main\" ALTER COLUMN \"amount\" INTEGER"
    );
}

#[test]
fn test_identical_schemas_need_no_alters() {
    let mode = IngestMode::AppendOnly(AppendOnly::default());
    let mut staging = main_fields();
    staging.pop();
    let pre_actions = generate(mode, Dialect::Ansi, main_fields(), staging).unwrap();

    assert_eq!(pre_actions.len(), 2);
}

#[test]
fn test_column_missing_from_staging_fails() {
    let mut main = main_fields();
    main.push(Field::new("legacy", DataType::Varchar));
    let mode = IngestMode::AppendOnly(AppendOnly::default());
    let err = generate(mode, Dialect::Ansi, main, staging_fields()).unwrap_err();

    assert!(matches!(
        err,
        GeneratorError::Planner(PlannerError::SchemaEvolution(_))
    ));
}

#[test]
fn test_missing_capability_fails() {
    let capabilities: CapabilitySet = [Capability::AddColumn].into_iter().collect();
    let generator = RelationalGenerator::new(
        IngestMode::AppendOnly(AppendOnly::default()),
        options(Dialect::Ansi)
            .with_planner_options(evolving())
            .with_capabilities(capabilities),
    );
    let err = generator
        .generate(&datasets_with_main(main_fields(), staging_fields()))
        .unwrap_err();

    let GeneratorError::Planner(PlannerError::SchemaEvolution(message)) = err else {
        panic!("expected a schema evolution error, got {:?}", err);
    };
    assert!(message.contains("resizing column 'amount'"));
}
