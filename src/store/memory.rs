//! In-memory repositories for tests.
//!
//! Every call yields to the runtime before touching the tables so concurrent
//! callers interleave the way they would against a real database.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::model::assignment::{Assignment, NewAssignment};
use crate::model::attendance::{AttendanceKey, AttendanceRecord, NewAttendance};
use crate::model::shift::{NewShift, Shift};
use crate::scheduling::directory::EmployeeDirectory;
use crate::store::{
    AssignmentFilter, AssignmentRepository, AttendanceFilter, AttendanceRepository, ShiftFilter,
    ShiftRepository, StoreError, StoreResult,
};

#[derive(Default)]
struct Tables {
    next_id: u64,
    shifts: BTreeMap<u64, Shift>,
    assignments: BTreeMap<u64, Assignment>,
    attendance: BTreeMap<u64, AttendanceRecord>,
}

impl Tables {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail as if the connection dropped
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn attendance_rows(&self) -> usize {
        self.tables.lock().unwrap().attendance.len()
    }

    pub fn assignment_rows(&self) -> usize {
        self.tables.lock().unwrap().assignments.len()
    }

    async fn enter(&self) -> StoreResult<()> {
        tokio::task::yield_now().await;
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ShiftRepository for MemoryStore {
    async fn find(&self, id: u64) -> StoreResult<Option<Shift>> {
        self.enter().await?;
        Ok(self.tables.lock().unwrap().shifts.get(&id).cloned())
    }

    async fn insert(&self, shift: NewShift) -> StoreResult<Shift> {
        self.enter().await?;
        let mut tables = self.tables.lock().unwrap();
        let shift = Shift {
            id: tables.next_id(),
            name: shift.name,
            start_time: shift.start_time,
            end_time: shift.end_time,
        };
        tables.shifts.insert(shift.id, shift.clone());
        Ok(shift)
    }

    async fn update(&self, shift: &Shift) -> StoreResult<()> {
        self.enter().await?;
        match self.tables.lock().unwrap().shifts.get_mut(&shift.id) {
            Some(row) => {
                *row = shift.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, id: u64) -> StoreResult<()> {
        self.enter().await?;
        self.tables
            .lock()
            .unwrap()
            .shifts
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn query(&self, filter: &ShiftFilter) -> StoreResult<Vec<Shift>> {
        self.enter().await?;
        let mut shifts: Vec<Shift> = self
            .tables
            .lock()
            .unwrap()
            .shifts
            .values()
            .filter(|s| Some(s.id) != filter.exclude_id)
            .cloned()
            .collect();
        shifts.sort_by_key(|s| (s.start_time, s.id));
        Ok(shifts)
    }
}

#[async_trait]
impl AssignmentRepository for MemoryStore {
    async fn find(&self, id: u64) -> StoreResult<Option<Assignment>> {
        self.enter().await?;
        Ok(self.tables.lock().unwrap().assignments.get(&id).cloned())
    }

    async fn insert(&self, assignment: NewAssignment) -> StoreResult<Assignment> {
        self.enter().await?;
        let mut tables = self.tables.lock().unwrap();
        let assignment = Assignment {
            id: tables.next_id(),
            employee_id: assignment.employee_id,
            shift_id: assignment.shift_id,
            start_date: assignment.start_date,
            end_date: assignment.end_date,
            created_at: assignment.created_at,
        };
        tables.assignments.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    async fn delete(&self, id: u64) -> StoreResult<()> {
        self.enter().await?;
        self.tables
            .lock()
            .unwrap()
            .assignments
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn query(&self, filter: &AssignmentFilter) -> StoreResult<Vec<Assignment>> {
        self.enter().await?;
        let mut rows: Vec<Assignment> = self
            .tables
            .lock()
            .unwrap()
            .assignments
            .values()
            .filter(|a| filter.employee_id.is_none_or(|id| a.employee_id == id))
            .filter(|a| filter.shift_id.is_none_or(|id| a.shift_id == id))
            .filter(|a| filter.active_on.is_none_or(|day| a.is_active_on(day)))
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.start_date, a.id));
        Ok(rows)
    }
}

#[async_trait]
impl AttendanceRepository for MemoryStore {
    async fn find(&self, key: &AttendanceKey) -> StoreResult<Option<AttendanceRecord>> {
        self.enter().await?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .attendance
            .values()
            .find(|r| r.key() == *key)
            .cloned())
    }

    async fn insert(&self, record: NewAttendance) -> StoreResult<AttendanceRecord> {
        self.enter().await?;
        let mut tables = self.tables.lock().unwrap();
        if tables.attendance.values().any(|r| r.key() == record.key) {
            return Err(StoreError::DuplicateKey("uq_attendance_day".into()));
        }
        let record = AttendanceRecord {
            id: tables.next_id(),
            employee_id: record.key.employee_id,
            shift_id: record.key.shift_id,
            work_date: record.key.work_date,
            clock_in: record.clock_in,
            clock_out: None,
            status: record.status,
        };
        tables.attendance.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, record: &AttendanceRecord) -> StoreResult<()> {
        self.enter().await?;
        match self.tables.lock().unwrap().attendance.get_mut(&record.id) {
            Some(row) => {
                *row = record.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn query(&self, filter: &AttendanceFilter) -> StoreResult<Vec<AttendanceRecord>> {
        self.enter().await?;
        let mut rows: Vec<AttendanceRecord> = self
            .tables
            .lock()
            .unwrap()
            .attendance
            .values()
            .filter(|r| filter.employee_id.is_none_or(|id| r.employee_id == id))
            .filter(|r| filter.shift_id.is_none_or(|id| r.shift_id == id))
            .filter(|r| filter.from.is_none_or(|from| r.work_date >= from))
            .filter(|r| filter.to.is_none_or(|to| r.work_date <= to))
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.work_date, r.shift_id));
        Ok(rows)
    }
}

/// Directory holding a fixed set of employee ids.
pub struct MemoryDirectory {
    employees: HashSet<u64>,
}

impl MemoryDirectory {
    pub fn with(ids: &[u64]) -> Self {
        Self {
            employees: ids.iter().copied().collect(),
        }
    }
}

#[async_trait]
impl EmployeeDirectory for MemoryDirectory {
    async fn exists(&self, employee_id: u64) -> StoreResult<bool> {
        Ok(self.employees.contains(&employee_id))
    }
}
