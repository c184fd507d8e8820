//! MySQL-backed repositories.

use async_trait::async_trait;
use moka::future::Cache;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use std::time::Duration;
use tracing::debug;

use crate::model::assignment::{Assignment, NewAssignment};
use crate::model::attendance::{AttendanceKey, AttendanceRecord, NewAttendance};
use crate::model::shift::{NewShift, Shift};
use crate::scheduling::directory::EmployeeDirectory;
use crate::store::{
    AssignmentFilter, AssignmentRepository, AttendanceFilter, AttendanceRepository, ShiftFilter,
    ShiftRepository, StoreError, StoreResult,
};

const ASSIGNMENT_COLUMNS: &str =
    "SELECT id, employee_id, shift_id, start_date, end_date, created_at FROM shift_assignments";

const ATTENDANCE_COLUMNS: &str = "SELECT id, employee_id, shift_id, work_date, clock_in, clock_out, status FROM shift_attendance";

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShiftRepository for MySqlStore {
    async fn find(&self, id: u64) -> StoreResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(
            "SELECT id, name, start_time, end_time FROM shifts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    async fn insert(&self, shift: NewShift) -> StoreResult<Shift> {
        let result = sqlx::query("INSERT INTO shifts (name, start_time, end_time) VALUES (?, ?, ?)")
            .bind(&shift.name)
            .bind(shift.start_time)
            .bind(shift.end_time)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_id();
        debug!(shift_id = id, name = %shift.name, "Shift row inserted");

        Ok(Shift {
            id,
            name: shift.name,
            start_time: shift.start_time,
            end_time: shift.end_time,
        })
    }

    async fn update(&self, shift: &Shift) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE shifts SET name = ?, start_time = ?, end_time = ? WHERE id = ?")
                .bind(&shift.name)
                .bind(shift.start_time)
                .bind(shift.end_time)
                .bind(shift.id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: u64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM shifts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn query(&self, filter: &ShiftFilter) -> StoreResult<Vec<Shift>> {
        let mut qb: QueryBuilder<MySql> =
            QueryBuilder::new("SELECT id, name, start_time, end_time FROM shifts");
        if let Some(id) = filter.exclude_id {
            qb.push(" WHERE id <> ").push_bind(id);
        }
        qb.push(" ORDER BY start_time, id");

        let shifts = qb.build_query_as::<Shift>().fetch_all(&self.pool).await?;
        Ok(shifts)
    }
}

#[async_trait]
impl AssignmentRepository for MySqlStore {
    async fn find(&self, id: u64) -> StoreResult<Option<Assignment>> {
        let assignment = sqlx::query_as::<_, Assignment>(&format!("{ASSIGNMENT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(assignment)
    }

    async fn insert(&self, assignment: NewAssignment) -> StoreResult<Assignment> {
        let result = sqlx::query(
            r#"
            INSERT INTO shift_assignments (employee_id, shift_id, start_date, end_date, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(assignment.employee_id)
        .bind(assignment.shift_id)
        .bind(assignment.start_date)
        .bind(assignment.end_date)
        .bind(assignment.created_at)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id();
        debug!(
            assignment_id = id,
            employee_id = assignment.employee_id,
            shift_id = assignment.shift_id,
            "Assignment row inserted"
        );

        Ok(Assignment {
            id,
            employee_id: assignment.employee_id,
            shift_id: assignment.shift_id,
            start_date: assignment.start_date,
            end_date: assignment.end_date,
            created_at: assignment.created_at,
        })
    }

    async fn delete(&self, id: u64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM shift_assignments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn query(&self, filter: &AssignmentFilter) -> StoreResult<Vec<Assignment>> {
        let mut qb: QueryBuilder<MySql> = QueryBuilder::new(ASSIGNMENT_COLUMNS);
        qb.push(" WHERE 1 = 1");
        if let Some(employee_id) = filter.employee_id {
            qb.push(" AND employee_id = ").push_bind(employee_id);
        }
        if let Some(shift_id) = filter.shift_id {
            qb.push(" AND shift_id = ").push_bind(shift_id);
        }
        if let Some(day) = filter.active_on {
            qb.push(" AND end_date >= ").push_bind(day);
        }
        qb.push(" ORDER BY start_date, id");

        let rows = qb.build_query_as::<Assignment>().fetch_all(&self.pool).await?;
        Ok(rows)
    }
}

#[async_trait]
impl AttendanceRepository for MySqlStore {
    async fn find(&self, key: &AttendanceKey) -> StoreResult<Option<AttendanceRecord>> {
        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            "{ATTENDANCE_COLUMNS} WHERE employee_id = ? AND shift_id = ? AND work_date = ?"
        ))
        .bind(key.employee_id)
        .bind(key.shift_id)
        .bind(key.work_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn insert(&self, record: NewAttendance) -> StoreResult<AttendanceRecord> {
        // uq_attendance_day turns a lost race into DuplicateKey
        let result = sqlx::query(
            r#"
            INSERT INTO shift_attendance (employee_id, shift_id, work_date, clock_in, status)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.key.employee_id)
        .bind(record.key.shift_id)
        .bind(record.key.work_date)
        .bind(record.clock_in)
        .bind(record.status.as_ref())
        .execute(&self.pool)
        .await?;

        Ok(AttendanceRecord {
            id: result.last_insert_id(),
            employee_id: record.key.employee_id,
            shift_id: record.key.shift_id,
            work_date: record.key.work_date,
            clock_in: record.clock_in,
            clock_out: None,
            status: record.status,
        })
    }

    async fn update(&self, record: &AttendanceRecord) -> StoreResult<()> {
        let result = sqlx::query("UPDATE shift_attendance SET clock_out = ?, status = ? WHERE id = ?")
            .bind(record.clock_out)
            .bind(record.status.as_ref())
            .bind(record.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn query(&self, filter: &AttendanceFilter) -> StoreResult<Vec<AttendanceRecord>> {
        let mut qb: QueryBuilder<MySql> = QueryBuilder::new(ATTENDANCE_COLUMNS);
        qb.push(" WHERE 1 = 1");
        if let Some(employee_id) = filter.employee_id {
            qb.push(" AND employee_id = ").push_bind(employee_id);
        }
        if let Some(shift_id) = filter.shift_id {
            qb.push(" AND shift_id = ").push_bind(shift_id);
        }
        if let Some(from) = filter.from {
            qb.push(" AND work_date >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            qb.push(" AND work_date <= ").push_bind(to);
        }
        qb.push(" ORDER BY work_date, shift_id");

        let rows = qb
            .build_query_as::<AttendanceRecord>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// Employee lookups against the HR `employees` table.
///
/// Known ids are cached for `ttl`; misses always go to the database so a
/// freshly hired employee is visible immediately.
pub struct MySqlEmployeeDirectory {
    pool: MySqlPool,
    known: Cache<u64, ()>,
}

impl MySqlEmployeeDirectory {
    pub fn new(pool: MySqlPool, ttl: Duration) -> Self {
        Self {
            pool,
            known: Cache::builder()
                .max_capacity(100_000)
                .time_to_live(ttl)
                .build(),
        }
    }
}

#[async_trait]
impl EmployeeDirectory for MySqlEmployeeDirectory {
    async fn exists(&self, employee_id: u64) -> StoreResult<bool> {
        if self.known.contains_key(&employee_id) {
            return Ok(true);
        }

        let found: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM employees WHERE id = ? LIMIT 1)")
                .bind(employee_id)
                .fetch_one(&self.pool)
                .await?;

        if found != 0 {
            self.known.insert(employee_id, ()).await;
        }
        Ok(found != 0)
    }
}
