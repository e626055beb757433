// File: crates/netchart-core/src/forecast.rs
// Summary: Usage estimate past the last real sample, blending a long-run
// average rate with a same-time-last-week short window.

use log::warn;

use crate::error::{ChartError, Result};
use crate::history::{prorate, UsageHistory};
use crate::path::Path;
use crate::scale::{bytes_value, AxisMapper};
use crate::types::{Viewport, DAY_MILLIS, WEEK_MILLIS};

/// Forecast tuning. Defaults give `(7 * long + 3 * short) / 10` per bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForecastConfig {
    /// Trailing window for the long-run rate.
    pub long_window: i64,
    /// Window for the seasonal rate, ending at the same time one season ago.
    pub short_window: i64,
    /// Seasonal period.
    pub season: i64,
    pub long_weight: u64,
    pub short_weight: u64,
    /// Hard cap on projected steps.
    pub max_steps: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            long_window: 2 * WEEK_MILLIS,
            short_window: DAY_MILLIS,
            season: WEEK_MILLIS,
            long_weight: 7,
            short_weight: 3,
            max_steps: 100_000,
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> Result<()> {
        if self.long_window <= 0 || self.short_window <= 0 {
            return Err(ChartError::InvalidForecastConfig("windows must be positive"));
        }
        if self.season <= 0 {
            return Err(ChartError::InvalidForecastConfig("season must be positive"));
        }
        if self.long_weight.saturating_add(self.short_weight) == 0 {
            return Err(ChartError::InvalidForecastConfig("weights must not both be zero"));
        }
        if self.max_steps == 0 {
            return Err(ChartError::InvalidForecastConfig("max_steps must be positive"));
        }
        Ok(())
    }

    /// Weighted per-bucket delta, truncated.
    #[inline]
    pub fn blend(&self, long_rate: u64, short_rate: u64) -> u64 {
        let num = long_rate as u128 * self.long_weight as u128
            + short_rate as u128 * self.short_weight as u128;
        let den = (self.long_weight as u128 + self.short_weight as u128).max(1);
        u64::try_from(num / den).unwrap_or(u64::MAX)
    }
}

/// Where the real data left off.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForecastStart {
    pub x: f32,
    pub y: f32,
    pub time: i64,
    pub total: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Estimate {
    pub path: Path,
    /// Running total after the last projected step.
    pub total: u64,
    pub steps: usize,
    /// True when `max_steps` stopped the loop before the right edge.
    pub capped: bool,
}

/// Bytes in `[start, end)` scaled to one nominal bucket.
pub fn window_rate(
    history: &dyn UsageHistory,
    start: i64,
    end: i64,
    now: i64,
    bucket_duration: i64,
) -> u64 {
    let entry = history.aggregate(start, end, now);
    if entry.duration <= 0 {
        return 0;
    }
    prorate(entry.total_bytes(), bucket_duration, entry.duration)
}

/// Step forward one nominal bucket at a time until x reaches the right edge.
pub fn project(
    history: &dyn UsageHistory,
    horiz: &dyn AxisMapper,
    vert: &dyn AxisMapper,
    viewport: Viewport,
    from: ForecastStart,
    now: i64,
    config: &ForecastConfig,
) -> Result<Estimate> {
    let bucket_duration = history.bucket_duration();
    if bucket_duration <= 0 {
        return Err(ChartError::InvalidBucketDuration(bucket_duration));
    }
    config.validate()?;
    viewport.validate()?;

    let mut est = Estimate { total: from.total, ..Estimate::default() };
    est.path.move_to((from.x, from.y));

    let last_time = from.time;
    let long_start = last_time.saturating_sub(config.long_window);
    let long_rate = window_rate(history, long_start, last_time, now, bucket_duration);

    let mut x = from.x;
    let mut future: i64 = 0;
    while x < viewport.width {
        if est.steps >= config.max_steps {
            warn!("estimate stopped after {} steps at x={x} (width {})", est.steps, viewport.width);
            est.capped = true;
            break;
        }
        future = future.saturating_add(bucket_duration);

        // same time of week, one season back
        let anchor = last_time
            .saturating_sub(config.season)
            .saturating_add(future.rem_euclid(config.season));
        let short_start = anchor.saturating_sub(config.short_window);
        let short_rate = window_rate(history, short_start, anchor, now, bucket_duration);

        est.total = est.total.saturating_add(config.blend(long_rate, short_rate));

        x = horiz.convert_to_point(last_time.saturating_add(future));
        let y = vert.convert_to_point(bytes_value(est.total));
        est.path.line_to((x, y));
        est.steps += 1;
    }

    Ok(est)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{Bucket, History};
    use crate::types::HOUR_MILLIS;

    /// Three weeks of hourly buckets at a constant rate.
    fn steady(bytes_per_hour: u64) -> History {
        let buckets = (0..24 * 21)
            .map(|i| Bucket::new(i * HOUR_MILLIS, HOUR_MILLIS, bytes_per_hour, 0))
            .collect();
        History::from_buckets(HOUR_MILLIS, buckets).unwrap()
    }

    #[test]
    fn default_blend_is_seventy_thirty() {
        let c = ForecastConfig::default();
        assert_eq!(c.blend(100, 200), 130);
        assert_eq!(c.blend(1, 0), 0);
        assert_eq!(c.blend(0, 10), 3);
    }

    #[test]
    fn steady_history_projects_steady_rate() {
        let h = steady(3_600);
        let last = h.end().unwrap();
        let horiz = move |t: i64| ((t - last) / HOUR_MILLIS) as f32 * 10.0;
        let vert = |b: i64| b as f32;
        let from = ForecastStart { x: 0.0, y: 0.0, time: last, total: 1_000 };
        let config = ForecastConfig::default();
        let est = project(&h, &horiz, &vert, Viewport::new(45.0, 100.0), from, i64::MAX, &config)
            .unwrap();

        assert_eq!(est.steps, 5);
        assert_eq!(est.total, 1_000 + 5 * 3_600);
        let xs: Vec<f32> = est.path.points().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
        assert!(!est.capped);
    }

    #[test]
    fn no_history_in_windows_stays_flat() {
        let h =
            History::from_buckets(HOUR_MILLIS, vec![Bucket::new(0, HOUR_MILLIS, 0, 0)]).unwrap();
        let last = 100 * WEEK_MILLIS;
        let horiz = move |t: i64| ((t - last) / HOUR_MILLIS) as f32;
        let from = ForecastStart { x: 0.0, y: 7.0, time: last, total: 42 };
        let vert = |b: i64| b as f32;
        let config = ForecastConfig::default();
        let est = project(&h, &horiz, &vert, Viewport::new(3.0, 10.0), from, 0, &config).unwrap();
        assert_eq!(est.total, 42);
        assert!(est.path.points().skip(1).all(|p| p.y == 42.0));
    }

    #[test]
    fn step_cap_bounds_a_stuck_axis() {
        let h = steady(10);
        let config = ForecastConfig { max_steps: 3, ..ForecastConfig::default() };
        let from = ForecastStart { x: 0.0, y: 0.0, time: h.end().unwrap(), total: 0 };
        let (horiz, vert) = (|_t: i64| 0.0f32, |b: i64| b as f32);
        let est = project(&h, &horiz, &vert, Viewport::new(10.0, 10.0), from, i64::MAX, &config)
            .unwrap();
        assert_eq!(est.steps, 3);
        assert_eq!(est.path.len(), 4);
        assert!(est.capped);
    }

    struct ZeroDuration;

    impl UsageHistory for ZeroDuration {
        fn len(&self) -> usize {
            2
        }

        fn bucket(&self, _index: usize) -> Option<Bucket> {
            None
        }

        fn bucket_duration(&self) -> i64 {
            0
        }

        fn aggregate(&self, start: i64, end: i64, _as_of: i64) -> Bucket {
            Bucket::new(start, end - start, 0, 0)
        }
    }

    #[test]
    fn rejects_non_positive_bucket_duration() {
        let from = ForecastStart { x: 0.0, y: 0.0, time: 0, total: 0 };
        let (horiz, vert) = (|t: i64| t as f32, |b: i64| b as f32);
        let config = ForecastConfig::default();
        let err = project(&ZeroDuration, &horiz, &vert, Viewport::new(10.0, 10.0), from, 0, &config)
            .unwrap_err();
        assert_eq!(err, ChartError::InvalidBucketDuration(0));
    }

    #[test]
    fn rejects_infinite_viewport() {
        let h = steady(1);
        let from = ForecastStart { x: 0.0, y: 0.0, time: h.end().unwrap(), total: 0 };
        let (horiz, vert) = (|t: i64| t as f32, |b: i64| b as f32);
        let viewport = Viewport::new(f32::INFINITY, 10.0);
        let err = project(&h, &horiz, &vert, viewport, from, 0, &ForecastConfig::default());
        assert!(matches!(err, Err(ChartError::InvalidViewport { .. })));
    }

    #[test]
    fn config_validation() {
        assert!(ForecastConfig::default().validate().is_ok());
        let bad = ForecastConfig { long_weight: 0, short_weight: 0, ..ForecastConfig::default() };
        assert!(bad.validate().is_err());
        let bad = ForecastConfig { season: 0, ..ForecastConfig::default() };
        assert!(bad.validate().is_err());
    }
}
