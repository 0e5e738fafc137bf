//! The seam between the engine and whatever stores punches.

use crate::event::PunchEvent;
use crate::period::PeriodFilter;
use crate::types::SubjectId;

/// Supplies an employee's punches.
///
/// Implementations return active punches only, in any order; the engine sorts.
pub trait PunchSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Punches for `subject` whose calendar day falls inside `period`.
    fn fetch(
        &self,
        subject: &SubjectId,
        period: &PeriodFilter,
    ) -> Result<Vec<PunchEvent>, Self::Error>;
}
