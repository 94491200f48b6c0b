//! Bitemporal planners with the validity interval supplied by staging.
//!
//! Staging carries both ends of the validity interval. Rows are identified by
//! their keys plus the validity start; transaction time is milestoned the
//! same way as the unitemporal planners.

use crate::ingest_mode::{BitemporalDelta, BitemporalSnapshot, ValidityMilestoning};
use crate::logical::{DatasetDefinition, Operation, Selection};

use super::common::PlanScope;
use super::statistics::StatisticName;
use super::unitemporal::{UnitemporalDeltaPlanner, Validity};
use super::{Planner, PlannerResult};

impl From<&ValidityMilestoning> for Validity {
    fn from(milestoning: &ValidityMilestoning) -> Self {
        let ValidityMilestoning::SourceSpecifiesFromAndThrough {
            from_field,
            through_field,
            source_from_field,
            source_through_field,
        } = milestoning;
        Validity {
            from: from_field.clone(),
            through: through_field.clone(),
            source_from: source_from_field.clone(),
            source_through: source_through_field.clone(),
        }
    }
}

pub struct BitemporalDeltaPlanner<'a> {
    inner: UnitemporalDeltaPlanner<'a>,
}

impl<'a> BitemporalDeltaPlanner<'a> {
    pub fn new(scope: PlanScope<'a>, config: &'a BitemporalDelta) -> PlannerResult<Self> {
        let inner = UnitemporalDeltaPlanner::build(
            scope,
            &config.digest_field,
            &config.transaction_milestoning,
            Some(Validity::from(&config.validity_milestoning)),
        )?;
        Ok(Self { inner })
    }
}

impl Planner for BitemporalDeltaPlanner<'_> {
    fn main(&self) -> &DatasetDefinition {
        self.inner.main()
    }

    fn bookkeeping_fields(&self) -> Vec<String> {
        self.inner.bookkeeping_fields()
    }

    fn column_mapping(&self) -> Vec<(String, String)> {
        self.inner.column_mapping()
    }

    fn ingest(&self) -> PlannerResult<Vec<Operation>> {
        self.inner.ingest()
    }

    fn post_ingest_statistics(&self) -> Vec<(StatisticName, Selection)> {
        self.inner.post_ingest_statistics()
    }
}

/// Staging holds every current interval; open rows it no longer carries are
/// closed.
pub struct BitemporalSnapshotPlanner<'a> {
    inner: UnitemporalDeltaPlanner<'a>,
}

impl<'a> BitemporalSnapshotPlanner<'a> {
    pub fn new(scope: PlanScope<'a>, config: &'a BitemporalSnapshot) -> PlannerResult<Self> {
        let inner = UnitemporalDeltaPlanner::build(
            scope,
            &config.digest_field,
            &config.transaction_milestoning,
            Some(Validity::from(&config.validity_milestoning)),
        )?;
        Ok(Self { inner })
    }
}

impl Planner for BitemporalSnapshotPlanner<'_> {
    fn main(&self) -> &DatasetDefinition {
        self.inner.main()
    }

    fn bookkeeping_fields(&self) -> Vec<String> {
        self.inner.bookkeeping_fields()
    }

    fn column_mapping(&self) -> Vec<(String, String)> {
        self.inner.column_mapping()
    }

    fn ingest(&self) -> PlannerResult<Vec<Operation>> {
        Ok(self.inner.snapshot_ingest())
    }

    fn post_ingest_statistics(&self) -> Vec<(StatisticName, Selection)> {
        self.inner.snapshot_statistics()
    }
}
