//! Schedule fetch contract.
//!
//! Fetching and parsing the timetable site is an external collaborator;
//! the engines only depend on this seam.

use crate::error::Result;
use crate::model::Schedule;

/// Whether a cached snapshot is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheHint {
    /// Serve the cache when it is still warm.
    AllowCache,
    /// Always hit the source site.
    PreferFresh,
}

/// Supplies schedule snapshots for a lookup query.
///
/// Implementations must set [`Schedule::source_state`] and, when it is
/// `Changed`, populate the change set. Expected failures:
/// [`crate::error::CoreError::NotFound`] when the query matches nothing and
/// [`crate::error::CoreError::ExternalFetchFailure`] when the source is
/// unreachable (callers report it, they do not retry).
pub trait ScheduleSource {
    fn fetch(&self, query: &str, hint: CacheHint) -> Result<Schedule>;
}
