//! Shift-conflict resolution and attendance state.
//!
//! Three components, each behind a capability trait, plus the [`Scheduler`]
//! facade the HTTP layer talks to. Storage, the employee directory and the
//! clock are injected so the whole core runs against in-memory doubles in
//! tests.

pub mod assignment_ledger;
pub mod attendance_tracker;
pub mod clock;
pub mod directory;
pub mod error;
pub mod facade;
pub mod locks;
pub mod shift_catalog;
pub mod window;

pub use clock::SystemClock;
pub use error::{ConflictKind, NotFoundKind, SchedulingError, SchedulingResult};
pub use facade::Scheduler;
