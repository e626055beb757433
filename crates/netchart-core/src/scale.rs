// File: crates/netchart-core/src/scale.rs
// Summary: Time (X) and cumulative data (Y) scales mapping values into screen coordinates.

/// Maps a timestamp or byte count onto one screen axis.
/// Contract: monotonic non-decreasing over the whole queried domain.
pub trait AxisMapper {
    fn convert_to_point(&self, value: i64) -> f32;
}

impl<F> AxisMapper for F
where
    F: Fn(i64) -> f32,
{
    #[inline]
    fn convert_to_point(&self, value: i64) -> f32 {
        self(value)
    }
}

/// Horizontal time scale: `min` maps to 0 and `max` to `size`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    pub min: i64,
    pub max: i64,
    pub size: f32,
}

impl TimeScale {
    pub fn new(min: i64, max: i64, size: f32) -> Self {
        let mut s = Self { min, max, size };
        s.set_bounds(min, max);
        s
    }

    pub fn set_bounds(&mut self, min: i64, max: i64) {
        self.min = min;
        self.max = if max <= min { min.saturating_add(1) } else { max };
    }

    pub fn set_size(&mut self, size: f32) {
        self.size = size;
    }

    #[inline]
    pub fn to_px(&self, t: i64) -> f32 {
        let span = self.max.saturating_sub(self.min) as f64;
        (t.saturating_sub(self.min) as f64 / span * self.size as f64) as f32
    }

    #[inline]
    pub fn from_px(&self, px: f32) -> i64 {
        let span = self.max.saturating_sub(self.min) as f64;
        self.min + (px as f64 / self.size.max(f32::EPSILON) as f64 * span).round() as i64
    }
}

impl AxisMapper for TimeScale {
    fn convert_to_point(&self, value: i64) -> f32 {
        self.to_px(value)
    }
}

/// Vertical data scale, inverted so `min` sits on the bottom edge (`size`)
/// and `max` on the top edge (0).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DataScale {
    pub min: i64,
    pub max: i64,
    pub size: f32,
}

impl DataScale {
    pub fn new(min: i64, max: i64, size: f32) -> Self {
        let mut s = Self { min, max, size };
        s.set_bounds(min, max);
        s
    }

    pub fn set_bounds(&mut self, min: i64, max: i64) {
        self.min = min;
        self.max = if max <= min { min.saturating_add(1) } else { max };
    }

    pub fn set_size(&mut self, size: f32) {
        self.size = size;
    }

    #[inline]
    pub fn to_px(&self, v: i64) -> f32 {
        let span = self.max.saturating_sub(self.min) as f64;
        let ratio = v.saturating_sub(self.min) as f64 / span;
        (self.size as f64 - ratio * self.size as f64) as f32
    }

    #[inline]
    pub fn from_px(&self, py: f32) -> i64 {
        let span = self.max.saturating_sub(self.min) as f64;
        let ratio = (self.size - py) as f64 / self.size.max(f32::EPSILON) as f64;
        self.min + (ratio * span).round() as i64
    }
}

impl AxisMapper for DataScale {
    fn convert_to_point(&self, value: i64) -> f32 {
        self.to_px(value)
    }
}

/// Saturating conversion of a byte total into the mapper domain.
#[inline]
pub fn bytes_value(total: u64) -> i64 {
    i64::try_from(total).unwrap_or(i64::MAX)
}
