use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

use crate::model::assignment::Assignment;
use crate::model::attendance::AttendanceRecord;
use crate::model::shift::{NewShift, Shift, ShiftUpdate};
use crate::scheduling::assignment_ledger::{AssignmentLedger, AssignmentLedgerService};
use crate::scheduling::attendance_tracker::{AttendanceTracker, AttendanceTrackerService};
use crate::scheduling::clock::Clock;
use crate::scheduling::directory::EmployeeDirectory;
use crate::scheduling::error::{ConflictKind, NotFoundKind, SchedulingError, SchedulingResult};
use crate::scheduling::locks::KeyedLocks;
use crate::scheduling::shift_catalog::{ShiftCatalog, ShiftCatalogService};
use crate::store::{AssignmentRepository, AttendanceRepository, ShiftRepository};

/// Entry point for every scheduling use case.
///
/// Adds the cross-component checks (employee exists, shift exists, shift not
/// in use) and otherwise delegates to the three components unchanged.
pub struct Scheduler {
    catalog: Arc<dyn ShiftCatalog>,
    ledger: Arc<dyn AssignmentLedger>,
    tracker: Arc<dyn AttendanceTracker>,
    directory: Arc<dyn EmployeeDirectory>,
    clock: Arc<dyn Clock>,
    /// Same table the ledger takes around assign and remove
    shift_locks: Arc<KeyedLocks<u64>>,
}

impl Scheduler {
    pub fn new(
        catalog: Arc<dyn ShiftCatalog>,
        ledger: Arc<dyn AssignmentLedger>,
        tracker: Arc<dyn AttendanceTracker>,
        directory: Arc<dyn EmployeeDirectory>,
        clock: Arc<dyn Clock>,
        shift_locks: Arc<KeyedLocks<u64>>,
    ) -> Self {
        Self {
            catalog,
            ledger,
            tracker,
            directory,
            clock,
            shift_locks,
        }
    }

    /// Wire the default components over one store that backs all three tables.
    pub fn from_store<S>(
        store: Arc<S>,
        directory: Arc<dyn EmployeeDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        S: ShiftRepository + AssignmentRepository + AttendanceRepository + 'static,
    {
        let shift_locks = Arc::new(KeyedLocks::new());
        let catalog = ShiftCatalogService::new(store.clone());
        let ledger = AssignmentLedgerService::new(
            store.clone(),
            store.clone(),
            shift_locks.clone(),
            clock.clone(),
        );
        let tracker = AttendanceTrackerService::new(store, clock.clone());

        Self::new(
            Arc::new(catalog),
            Arc::new(ledger),
            Arc::new(tracker),
            directory,
            clock,
            shift_locks,
        )
    }

    async fn ensure_employee(&self, employee_id: u64) -> SchedulingResult<()> {
        if self.directory.exists(employee_id).await? {
            Ok(())
        } else {
            debug!(employee_id, "Unknown employee");
            Err(SchedulingError::NotFound(NotFoundKind::Employee(employee_id)))
        }
    }

    pub async fn create_shift(&self, shift: NewShift) -> SchedulingResult<Shift> {
        self.catalog.create_shift(shift).await
    }

    pub async fn update_shift(&self, id: u64, update: ShiftUpdate) -> SchedulingResult<Shift> {
        self.catalog.update_shift(id, update).await
    }

    pub async fn get_shift(&self, id: u64) -> SchedulingResult<Shift> {
        self.catalog.get_shift(id).await
    }

    pub async fn list_shifts(&self) -> SchedulingResult<Vec<Shift>> {
        self.catalog.list_shifts().await
    }

    /// Refused while any assignment of the shift has not ended yet.
    pub async fn delete_shift(&self, id: u64) -> SchedulingResult<()> {
        // no assignment of this shift can be written until the delete is done
        let _guard = self.shift_locks.acquire(id).await;

        self.catalog.get_shift(id).await?;

        let active = self
            .ledger
            .active_assignments_for_shift(id, self.clock.today())
            .await?;
        if !active.is_empty() {
            return Err(SchedulingError::Conflict(ConflictKind::ShiftInUse {
                active: active.len(),
            }));
        }

        self.catalog.delete_shift(id).await
    }

    pub async fn assign_shift(
        &self,
        employee_id: u64,
        shift_id: u64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> SchedulingResult<Assignment> {
        self.ensure_employee(employee_id).await?;
        self.ledger
            .assign_shift(employee_id, shift_id, start_date, end_date)
            .await
    }

    pub async fn list_assignments(&self, employee_id: u64) -> SchedulingResult<Vec<Assignment>> {
        self.ensure_employee(employee_id).await?;
        self.ledger.list_assignments(employee_id).await
    }

    pub async fn remove_assignment(&self, id: u64) -> SchedulingResult<()> {
        self.ledger.remove_assignment(id).await
    }

    pub async fn clock_in(
        &self,
        employee_id: u64,
        shift_id: u64,
    ) -> SchedulingResult<AttendanceRecord> {
        self.ensure_employee(employee_id).await?;
        self.catalog.get_shift(shift_id).await?;
        self.tracker.clock_in(employee_id, shift_id).await
    }

    pub async fn clock_out(
        &self,
        employee_id: u64,
        shift_id: u64,
    ) -> SchedulingResult<AttendanceRecord> {
        self.ensure_employee(employee_id).await?;
        self.tracker.clock_out(employee_id, shift_id).await
    }

    pub async fn attendance(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> SchedulingResult<Vec<AttendanceRecord>> {
        self.ensure_employee(employee_id).await?;
        self.tracker.attendance_between(employee_id, from, to).await
    }
}
