// File: crates/netchart-core/src/series.rs
// Summary: Network usage series; turns a bound history into stroke, fill, and estimate outlines.
// Notes:
// - `generate_curves` is pure: state, history, and axes in, fresh curves out.
// - `NetworkSeries` keeps the last generated curves for a host that binds
//   data and toggles view state between passes.

use log::debug;

use crate::error::Result;
use crate::forecast::{project, ForecastConfig, ForecastStart};
use crate::history::UsageHistory;
use crate::path::Path;
use crate::scale::AxisMapper;
use crate::types::Viewport;
use crate::walk::walk_real;

/// View state the outlines depend on, recorded by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeriesState {
    /// Sub-interval the renderer paints with the primary fill.
    pub primary_left: i64,
    pub primary_right: i64,
    /// Real outlines are held flat out to this time when data ends earlier.
    pub end_time: Option<i64>,
    pub estimate_visible: bool,
}

/// Horizontal (time) and vertical (cumulative bytes) mappers.
#[derive(Clone, Copy)]
pub struct Axes<'a> {
    pub horiz: &'a dyn AxisMapper,
    pub vert: &'a dyn AxisMapper,
}

impl<'a> Axes<'a> {
    pub fn new(horiz: &'a dyn AxisMapper, vert: &'a dyn AxisMapper) -> Self {
        Self { horiz, vert }
    }
}

/// Output of one generation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Curves {
    pub stroke: Path,
    /// Stroke outline closed down to the bottom edge.
    pub fill: Path,
    pub estimate: Path,
    pub max_real: u64,
    pub max_estimate: u64,
}

impl Curves {
    /// Largest total the host should fit on the vertical axis.
    pub fn max_visible(&self, estimate_visible: bool) -> u64 {
        if estimate_visible { self.max_estimate } else { self.max_real }
    }

    pub fn is_empty(&self) -> bool {
        self.stroke.is_empty() && self.fill.is_empty() && self.estimate.is_empty()
    }
}

/// Build all three outlines from scratch.
///
/// Fewer than two buckets (or no history) yields empty curves and zero
/// maxima. Errors only on an invalid viewport, forecast config, or a
/// non-positive nominal bucket duration.
pub fn generate_curves(
    history: Option<&dyn UsageHistory>,
    state: &SeriesState,
    axes: Axes<'_>,
    viewport: Viewport,
    now: i64,
    config: &ForecastConfig,
) -> Result<Curves> {
    viewport.validate()?;

    let history = match history {
        Some(h) if h.len() >= 2 => h,
        _ => return Ok(Curves::default()),
    };

    let walk = walk_real(history, axes.horiz, axes.vert, viewport, state.end_time);

    if let Some(b) = walk.fill.bounds() {
        debug!(
            "rendered fill bounds=[{}, {}, {}, {}] total={}",
            b.left, b.top, b.right, b.bottom, walk.total
        );
    }

    let from = ForecastStart {
        x: walk.last_x,
        y: walk.last_y,
        time: walk.last_time,
        total: walk.total,
    };
    let estimate = project(history, axes.horiz, axes.vert, viewport, from, now, config)?;

    debug!("estimate steps={} max_estimate={}", estimate.steps, estimate.total);

    Ok(Curves {
        stroke: walk.stroke,
        fill: walk.fill,
        estimate: estimate.path,
        max_real: walk.total,
        max_estimate: estimate.total,
    })
}

/// Stateful series: unbound until a history is bound, then holds the
/// outlines of the last `generate` call.
pub struct NetworkSeries {
    history: Option<Box<dyn UsageHistory + Send + Sync>>,
    state: SeriesState,
    config: ForecastConfig,
    curves: Curves,
}

impl Default for NetworkSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkSeries {
    pub fn new() -> Self {
        Self {
            history: None,
            state: SeriesState::default(),
            config: ForecastConfig::default(),
            curves: Curves::default(),
        }
    }

    pub fn with_config(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, ..Self::new() })
    }

    /// Replace the history and clear every derived outline.
    pub fn bind(&mut self, history: impl UsageHistory + Send + Sync + 'static) {
        self.history = Some(Box::new(history));
        self.curves = Curves::default();
    }

    pub fn is_bound(&self) -> bool {
        self.history.is_some()
    }

    pub fn history(&self) -> Option<&(dyn UsageHistory + Send + Sync)> {
        self.history.as_deref()
    }

    pub fn state(&self) -> &SeriesState {
        &self.state
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn set_primary_range(&mut self, left: i64, right: i64) {
        self.state.primary_left = left;
        self.state.primary_right = right;
    }

    pub fn primary_range(&self) -> (i64, i64) {
        (self.state.primary_left, self.state.primary_right)
    }

    /// Primary range edges in screen space.
    pub fn primary_range_points(&self, horiz: &dyn AxisMapper) -> (f32, f32) {
        (
            horiz.convert_to_point(self.state.primary_left),
            horiz.convert_to_point(self.state.primary_right),
        )
    }

    pub fn set_end_time(&mut self, end_time: i64) {
        self.state.end_time = Some(end_time);
    }

    pub fn clear_end_time(&mut self) {
        self.state.end_time = None;
    }

    pub fn end_time(&self) -> Option<i64> {
        self.state.end_time
    }

    pub fn set_estimate_visible(&mut self, visible: bool) {
        self.state.estimate_visible = visible;
    }

    pub fn estimate_visible(&self) -> bool {
        self.state.estimate_visible
    }

    /// Regenerate all outlines. On error the previous curves are cleared.
    pub fn generate(&mut self, axes: Axes<'_>, viewport: Viewport, now: i64) -> Result<()> {
        debug!("generate() bound={}", self.is_bound());
        self.curves = Curves::default();
        let history = self.history.as_deref().map(|h| h as &dyn UsageHistory);
        self.curves = generate_curves(history, &self.state, axes, viewport, now, &self.config)?;
        Ok(())
    }

    pub fn curves(&self) -> &Curves {
        &self.curves
    }

    pub fn stroke(&self) -> &Path {
        &self.curves.stroke
    }

    pub fn fill(&self) -> &Path {
        &self.curves.fill
    }

    pub fn estimate(&self) -> &Path {
        &self.curves.estimate
    }

    pub fn max_real(&self) -> u64 {
        self.curves.max_real
    }

    pub fn max_estimate(&self) -> u64 {
        self.curves.max_estimate
    }

    pub fn max_visible(&self) -> u64 {
        self.curves.max_visible(self.state.estimate_visible)
    }
}
