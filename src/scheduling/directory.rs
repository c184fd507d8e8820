use async_trait::async_trait;

use crate::store::StoreResult;

/// Read-only view of the HR employee directory.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn exists(&self, employee_id: u64) -> StoreResult<bool>;
}
