// File: crates/netchart-core/src/lib.rs
// Summary: Core library entry point; exports usage history, scales, and series outline generation.

pub mod error;
pub mod types;
pub mod history;
pub mod scale;
pub mod path;
pub mod walk;
pub mod forecast;
pub mod series;
pub mod view;

pub use error::{ChartError, Result};
pub use types::{Point, Viewport};
pub use history::{Bucket, History, HistoryBuilder, UsageHistory};
pub use scale::{AxisMapper, DataScale, TimeScale};
pub use path::{Bounds, Path, Verb};
pub use forecast::ForecastConfig;
pub use series::{generate_curves, Axes, Curves, NetworkSeries, SeriesState};
pub use view::UsageChart;
