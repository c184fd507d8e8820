use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};

use crate::model::assignment::{Assignment, NewAssignment};
use crate::scheduling::clock::Clock;
use crate::scheduling::error::{ConflictKind, NotFoundKind, SchedulingError, SchedulingResult};
use crate::scheduling::locks::KeyedLocks;
use crate::scheduling::window::DateSpan;
use crate::store::{AssignmentFilter, AssignmentRepository, ShiftRepository};

#[async_trait]
pub trait AssignmentLedger: Send + Sync {
    async fn assign_shift(
        &self,
        employee_id: u64,
        shift_id: u64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> SchedulingResult<Assignment>;

    async fn list_assignments(&self, employee_id: u64) -> SchedulingResult<Vec<Assignment>>;

    async fn remove_assignment(&self, id: u64) -> SchedulingResult<()>;

    /// Assignments of `shift_id` whose last day is `on` or later
    async fn active_assignments_for_shift(
        &self,
        shift_id: u64,
        on: NaiveDate,
    ) -> SchedulingResult<Vec<Assignment>>;
}

pub struct AssignmentLedgerService {
    assignments: Arc<dyn AssignmentRepository>,
    shifts: Arc<dyn ShiftRepository>,
    clock: Arc<dyn Clock>,
    /// keyed by shift_id, shared with whoever deletes shifts
    shift_locks: Arc<KeyedLocks<u64>>,
}

impl AssignmentLedgerService {
    pub fn new(
        assignments: Arc<dyn AssignmentRepository>,
        shifts: Arc<dyn ShiftRepository>,
        shift_locks: Arc<KeyedLocks<u64>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            assignments,
            shifts,
            clock,
            shift_locks,
        }
    }
}

#[async_trait]
impl AssignmentLedger for AssignmentLedgerService {
    async fn assign_shift(
        &self,
        employee_id: u64,
        shift_id: u64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> SchedulingResult<Assignment> {
        // held until the insert so the shift cannot be deleted in between
        let _guard = self.shift_locks.acquire(shift_id).await;

        if self.shifts.find(shift_id).await?.is_none() {
            return Err(SchedulingError::NotFound(NotFoundKind::Shift(shift_id)));
        }
        let span = DateSpan::new(start_date, end_date)?;

        let existing = self
            .assignments
            .query(&AssignmentFilter {
                employee_id: Some(employee_id),
                shift_id: Some(shift_id),
                active_on: None,
            })
            .await?;

        if let Some(clash) = existing.iter().find(|a| a.span().overlaps(&span)) {
            debug!(
                employee_id,
                shift_id,
                clashes_with = clash.id,
                "Assignment rejected"
            );
            return Err(SchedulingError::Conflict(ConflictKind::AssignmentOverlap {
                with: clash.id,
            }));
        }

        let assignment = self
            .assignments
            .insert(NewAssignment {
                employee_id,
                shift_id,
                start_date,
                end_date,
                created_at: self.clock.now(),
            })
            .await?;

        info!(
            assignment_id = assignment.id,
            employee_id,
            shift_id,
            %start_date,
            %end_date,
            "Shift assigned"
        );
        Ok(assignment)
    }

    async fn list_assignments(&self, employee_id: u64) -> SchedulingResult<Vec<Assignment>> {
        let filter = AssignmentFilter {
            employee_id: Some(employee_id),
            ..Default::default()
        };
        Ok(self.assignments.query(&filter).await?)
    }

    async fn remove_assignment(&self, id: u64) -> SchedulingResult<()> {
        let assignment = self
            .assignments
            .find(id)
            .await?
            .ok_or(SchedulingError::NotFound(NotFoundKind::Assignment(id)))?;

        let _guard = self.shift_locks.acquire(assignment.shift_id).await;
        self.assignments
            .delete(id)
            .await
            .map_err(SchedulingError::missing(NotFoundKind::Assignment(id)))?;

        info!(
            assignment_id = id,
            employee_id = assignment.employee_id,
            shift_id = assignment.shift_id,
            "Assignment removed"
        );
        Ok(())
    }

    async fn active_assignments_for_shift(
        &self,
        shift_id: u64,
        on: NaiveDate,
    ) -> SchedulingResult<Vec<Assignment>> {
        let filter = AssignmentFilter {
            shift_id: Some(shift_id),
            active_on: Some(on),
            ..Default::default()
        };
        Ok(self.assignments.query(&filter).await?)
    }
}
