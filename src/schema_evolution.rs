//! Schema evolution: alters that bring main in line with staging.
//!
//! Each staging column is compared with the main column it is written to:
//!
//! | staging vs main                    | capability                   | alter              |
//! |------------------------------------|------------------------------|--------------------|
//! | column missing in main             | `AddColumn`                  | `ADD COLUMN`       |
//! | same type, longer length / scale   | `DataSizingChanges`          | change data type   |
//! | nullable where main is `NOT NULL`  | none                         | drop `NOT NULL`    |
//! | other type, implicitly convertible | `ImplicitDataTypeConversion` | none               |
//! | other type, explicitly convertible | `ExplicitDataTypeConversion` | change data type   |
//!
//! Anything else, including a main data column staging no longer carries,
//! fails the generation.

use tracing::debug;

use crate::logical::{Alter, AlterOperation, DatasetDefinition, Field, FieldType, Operation};
use crate::planner::{PlannerError, PlannerResult};
use crate::sql::{Capability, CapabilitySet, Dialect, SqlDialect};

pub struct SchemaEvolution<'a> {
    dialect: Dialect,
    capabilities: &'a CapabilitySet,
}

impl<'a> SchemaEvolution<'a> {
    pub fn new(dialect: Dialect, capabilities: &'a CapabilitySet) -> Self {
        Self {
            dialect,
            capabilities,
        }
    }

    fn require(&self, capability: Capability, change: impl FnOnce() -> String) -> PlannerResult<()> {
        if self.capabilities.contains(capability) {
            Ok(())
        } else {
            Err(PlannerError::SchemaEvolution(format!(
                "{} needs capability {}",
                change(),
                capability
            )))
        }
    }

    /// Alters for `main`, given the staging columns and how they map onto
    /// main. Bookkeeping columns of main are never compared.
    pub fn alters(
        &self,
        main: &DatasetDefinition,
        staging: &[Field],
        mapping: &[(String, String)],
        bookkeeping: &[String],
    ) -> PlannerResult<Vec<Operation>> {
        for field in &main.schema.fields {
            let carried = mapping.iter().any(|(_, to)| *to == field.name);
            if !carried && !bookkeeping.contains(&field.name) {
                return Err(PlannerError::SchemaEvolution(format!(
                    "column '{}' of '{}' is missing from staging",
                    field.name,
                    main.name()
                )));
            }
        }

        let mut alters = Vec::new();
        for (from, to) in mapping {
            let Some(incoming) = staging.iter().find(|f| f.name == *from) else {
                continue;
            };
            match main.schema.field(to) {
                None => {
                    self.require(Capability::AddColumn, || format!("adding column '{}'", to))?;
                    let mut added = incoming.with_name(to);
                    added.primary_key = false;
                    added.nullable = true;
                    alters.push(Alter::of(main, AlterOperation::AddColumn, added));
                }
                Some(existing) => alters.extend(self.evolve(main, existing, incoming)?),
            }
        }
        debug!(table = %main.name(), alters = alters.len(), "schema evolution");
        Ok(alters)
    }

    fn evolve(
        &self,
        main: &DatasetDefinition,
        existing: &Field,
        incoming: &Field,
    ) -> PlannerResult<Vec<Operation>> {
        let mut alters = Vec::new();
        let (current, wanted) = (existing.field_type, incoming.field_type);

        if current.data_type == wanted.data_type {
            if let Some(sized) = widened(current, wanted) {
                self.require(Capability::DataSizingChanges, || {
                    format!("resizing column '{}'", existing.name)
                })?;
                let mut changed = existing.clone();
                changed.field_type = sized;
                alters.push(Alter::of(main, AlterOperation::ChangeDatatype, changed));
            }
        } else if self
            .dialect
            .supports_implicit_mapping(current.data_type, wanted.data_type)
        {
            self.require(Capability::ImplicitDataTypeConversion, || {
                format!(
                    "storing {} in column '{}' of type {}",
                    wanted.data_type, existing.name, current.data_type
                )
            })?;
        } else if self
            .dialect
            .supports_explicit_mapping(current.data_type, wanted.data_type)
        {
            self.require(Capability::ExplicitDataTypeConversion, || {
                format!(
                    "converting column '{}' from {} to {}",
                    existing.name, current.data_type, wanted.data_type
                )
            })?;
            let mut changed = existing.clone();
            changed.field_type = wanted;
            alters.push(Alter::of(main, AlterOperation::ChangeDatatype, changed));
        } else {
            return Err(PlannerError::SchemaEvolution(format!(
                "column '{}' cannot change from {} to {} on {}",
                existing.name,
                current.data_type,
                wanted.data_type,
                self.dialect.name()
            )));
        }

        if !existing.nullable && incoming.nullable && !existing.primary_key {
            let mut relaxed = existing.clone();
            relaxed.nullable = true;
            alters.push(Alter::of(main, AlterOperation::NullableColumn, relaxed));
        }
        Ok(alters)
    }
}

/// `current` grown to fit `wanted`, when any part is larger.
fn widened(current: FieldType, wanted: FieldType) -> Option<FieldType> {
    let grow = |have: Option<u32>, want: Option<u32>| match (have, want) {
        (Some(have), Some(want)) if want > have => Some(want),
        _ => None,
    };
    let length = grow(current.length, wanted.length);
    let scale = grow(current.scale, wanted.scale);
    if length.is_none() && scale.is_none() {
        return None;
    }
    Some(FieldType {
        length: length.or(current.length),
        scale: scale.or(current.scale),
        ..current
    })
}
