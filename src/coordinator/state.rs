//! Per-view load state.
//!
//! Summary, chart and table each own one [`ViewState`]. They never read each
//! other's state.

use serde::Serialize;

use crate::charts::types::{BucketSet, ChartSeries, DistributionSeries};
use crate::error::ErrorKind;
use crate::models::{RawAggregateRow, SummaryStats, TripRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViewId {
    Summary,
    Chart,
    Table,
}

/// Identifies one fetch. Only the newest ticket of a view may write to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Ticket {
    pub view: ViewId,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// The last fetch failed. Data from an earlier success, if any, is kept.
    Failed(ErrorKind),
}

#[derive(Debug, Clone)]
pub struct ViewState<T> {
    phase: LoadPhase,
    data: Option<T>,
    generation: u64,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            phase: LoadPhase::Idle,
            data: None,
            generation: 0,
        }
    }
}

impl<T> ViewState<T> {
    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn error(&self) -> Option<&ErrorKind> {
        match &self.phase {
            LoadPhase::Failed(kind) => Some(kind),
            _ => None,
        }
    }

    /// Last known data is on screen next to a current error.
    pub fn is_stale(&self) -> bool {
        self.error().is_some() && self.data.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a fetch and returns its generation. Outstanding fetches become stale.
    pub(crate) fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.phase = LoadPhase::Loading;
        self.generation
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.phase == LoadPhase::Loading && self.generation == generation
    }

    pub(crate) fn resolve(&mut self, data: T) {
        self.data = Some(data);
        self.phase = LoadPhase::Loaded;
    }

    pub(crate) fn fail(&mut self, kind: ErrorKind) {
        self.phase = LoadPhase::Failed(kind);
    }

    /// Drops an in-flight fetch without a result.
    pub(crate) fn abandon(&mut self) {
        if self.phase == LoadPhase::Loading {
            self.generation += 1;
            self.phase = LoadPhase::Idle;
        }
    }
}

/// Summary cards plus the distribution charts derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub stats: SummaryStats,
    pub distribution: DistributionSeries,
    pub boroughs: ChartSeries,
    pub borough_labels: Vec<String>,
}

impl SummaryView {
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

/// The raw rows behind the trend charts and everything derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub rows: Vec<RawAggregateRow>,
    pub buckets: BucketSet,
    pub line: Vec<ChartSeries>,
    pub bar: ChartSeries,
    /// The backend had more rows than one chart page; the earliest dates are missing.
    pub truncated: bool,
}

impl ChartView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub page: u32,
    pub rows: Vec<TripRecord>,
}

impl TableView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generation_makes_old_one_stale() {
        let mut view: ViewState<u32> = ViewState::default();
        let first = view.begin();
        let second = view.begin();

        assert!(!view.is_current(first));
        assert!(view.is_current(second));
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let mut view = ViewState::default();
        let generation = view.begin();
        assert!(view.is_current(generation));
        view.resolve(7);

        view.begin();
        view.fail(ErrorKind::Timeout);

        assert_eq!(view.data(), Some(&7));
        assert_eq!(view.error(), Some(&ErrorKind::Timeout));
        assert!(view.is_stale());
    }

    #[test]
    fn test_abandon_only_affects_loading() {
        let mut view: ViewState<u32> = ViewState::default();
        view.begin();
        view.resolve(1);
        let before = view.generation();

        view.abandon();
        assert_eq!(view.phase(), &LoadPhase::Loaded);
        assert_eq!(view.generation(), before);

        let generation = view.begin();
        view.abandon();
        assert_eq!(view.phase(), &LoadPhase::Idle);
        assert!(!view.is_current(generation));
    }
}
