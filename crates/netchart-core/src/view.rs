// File: crates/netchart-core/src/view.rs
// Chart driver: owns the scales and viewport for one series and runs the
// generate -> read maxima -> rescale -> regenerate cycle.

use log::debug;

use crate::error::Result;
use crate::history::UsageHistory;
use crate::scale::{bytes_value, DataScale, TimeScale};
use crate::series::{Axes, NetworkSeries};
use crate::types::Viewport;

/// Smallest top of the data axis, so near-empty histories do not fill the chart.
pub const DEFAULT_MIN_DATA_MAX: i64 = 50 * 1024 * 1024;

pub struct UsageChart {
    pub time: TimeScale,
    pub data: DataScale,
    pub viewport: Viewport,
    pub series: NetworkSeries,
    pub min_data_max: i64,
}

impl UsageChart {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            time: TimeScale::new(0, 1, viewport.width),
            data: DataScale::new(0, DEFAULT_MIN_DATA_MAX, viewport.height),
            viewport,
            series: NetworkSeries::new(),
            min_data_max: DEFAULT_MIN_DATA_MAX,
        }
    }

    pub fn bind(&mut self, history: impl UsageHistory + Send + Sync + 'static) {
        self.series.bind(history);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.time.set_size(viewport.width);
        self.data.set_size(viewport.height);
    }

    /// Visible time window. Leaves the series end time unchanged.
    pub fn set_time_range(&mut self, start: i64, end: i64) {
        self.time.set_bounds(start, end);
    }

    /// Single generation pass with the current scales.
    pub fn generate(&mut self, now: i64) -> Result<()> {
        let axes = Axes::new(&self.time, &self.data);
        self.series.generate(axes, self.viewport, now)
    }

    /// Generate, fit the data axis to the visible maximum, regenerate.
    /// Returns the new top of the data axis.
    pub fn autoscale(&mut self, now: i64) -> Result<i64> {
        self.generate(now)?;

        let max_visible = bytes_value(self.series.max_visible());
        let top = max_visible.max(self.min_data_max).saturating_mul(11) / 10;
        debug!("autoscale max_visible={max_visible} data_max={} -> {top}", self.data.max);
        self.data.set_bounds(0, top);

        self.generate(now)?;
        Ok(self.data.max)
    }
}
