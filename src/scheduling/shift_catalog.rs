use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::model::shift::{NewShift, Shift, ShiftUpdate};
use crate::scheduling::error::{ConflictKind, NotFoundKind, SchedulingError, SchedulingResult};
use crate::scheduling::window::ShiftWindow;
use crate::store::{ShiftFilter, ShiftRepository};

const MAX_NAME_LEN: usize = 100;

#[async_trait]
pub trait ShiftCatalog: Send + Sync {
    async fn create_shift(&self, shift: NewShift) -> SchedulingResult<Shift>;

    async fn update_shift(&self, id: u64, update: ShiftUpdate) -> SchedulingResult<Shift>;

    async fn get_shift(&self, id: u64) -> SchedulingResult<Shift>;

    async fn list_shifts(&self) -> SchedulingResult<Vec<Shift>>;

    async fn delete_shift(&self, id: u64) -> SchedulingResult<()>;
}

/// Shift catalog over a [`ShiftRepository`].
///
/// The no-overlap rule spans the whole catalog, so every create and update
/// runs under one catalog-wide lock.
pub struct ShiftCatalogService {
    shifts: Arc<dyn ShiftRepository>,
    write_lock: Mutex<()>,
}

impl ShiftCatalogService {
    pub fn new(shifts: Arc<dyn ShiftRepository>) -> Self {
        Self {
            shifts,
            write_lock: Mutex::new(()),
        }
    }

    async fn ensure_no_overlap(
        &self,
        window: &ShiftWindow,
        exclude_id: Option<u64>,
    ) -> SchedulingResult<()> {
        let others = self.shifts.query(&ShiftFilter { exclude_id }).await?;

        if let Some(clash) = others.iter().find(|s| s.window().overlaps(window)) {
            debug!(clashes_with = clash.id, "Shift window rejected");
            return Err(SchedulingError::Conflict(ConflictKind::ShiftOverlap {
                with: clash.id,
            }));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> SchedulingResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SchedulingError::Validation("shift name must not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(SchedulingError::Validation(format!(
            "shift name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

#[async_trait]
impl ShiftCatalog for ShiftCatalogService {
    async fn create_shift(&self, shift: NewShift) -> SchedulingResult<Shift> {
        let name = validate_name(&shift.name)?;
        let window = ShiftWindow::new(shift.start_time, shift.end_time)?;

        let _guard = self.write_lock.lock().await;
        self.ensure_no_overlap(&window, None).await?;

        let created = self
            .shifts
            .insert(NewShift {
                name,
                start_time: shift.start_time,
                end_time: shift.end_time,
            })
            .await?;

        info!(shift_id = created.id, name = %created.name, "Shift created");
        Ok(created)
    }

    async fn update_shift(&self, id: u64, update: ShiftUpdate) -> SchedulingResult<Shift> {
        let name = update.name.as_deref().map(validate_name).transpose()?;
        let window = ShiftWindow::new(update.start_time, update.end_time)?;

        let _guard = self.write_lock.lock().await;
        let current = self
            .shifts
            .find(id)
            .await?
            .ok_or(SchedulingError::NotFound(NotFoundKind::Shift(id)))?;

        self.ensure_no_overlap(&window, Some(id)).await?;

        let updated = Shift {
            id,
            name: name.unwrap_or(current.name),
            start_time: update.start_time,
            end_time: update.end_time,
        };
        self.shifts
            .update(&updated)
            .await
            .map_err(SchedulingError::missing(NotFoundKind::Shift(id)))?;

        info!(shift_id = id, "Shift updated");
        Ok(updated)
    }

    async fn get_shift(&self, id: u64) -> SchedulingResult<Shift> {
        self.shifts
            .find(id)
            .await?
            .ok_or(SchedulingError::NotFound(NotFoundKind::Shift(id)))
    }

    async fn list_shifts(&self) -> SchedulingResult<Vec<Shift>> {
        Ok(self.shifts.query(&ShiftFilter::default()).await?)
    }

    async fn delete_shift(&self, id: u64) -> SchedulingResult<()> {
        let _guard = self.write_lock.lock().await;
        self.shifts
            .delete(id)
            .await
            .map_err(SchedulingError::missing(NotFoundKind::Shift(id)))?;

        info!(shift_id = id, "Shift deleted");
        Ok(())
    }
}
