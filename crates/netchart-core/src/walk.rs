// File: crates/netchart-core/src/walk.rs
// Summary: Real-data walk; accumulates bucket totals into stroke and fill outlines.
// Notes:
// - Drawing starts at the first bucket after index 0 whose end maps to x > 0,
//   moving to the previous point. That earlier bucket's bytes are never
//   counted, so a partially visible first bucket is not prorated.
// - The bucket that first crosses the right edge is still drawn and counted,
//   but `last_x`/`last_y` keep the point before it.

use crate::history::UsageHistory;
use crate::path::Path;
use crate::scale::{bytes_value, AxisMapper};
use crate::types::Viewport;

/// End state of the real-data walk, handed to the forecast.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RealWalk {
    pub stroke: Path,
    pub fill: Path,
    /// Running total after the walk.
    pub total: u64,
    pub first_x: f32,
    pub last_x: f32,
    pub last_y: f32,
    /// End time of the last bucket processed, `i64::MIN` when none was.
    pub last_time: i64,
    pub started: bool,
}

pub fn walk_real(
    history: &dyn UsageHistory,
    horiz: &dyn AxisMapper,
    vert: &dyn AxisMapper,
    viewport: Viewport,
    end_time: Option<i64>,
) -> RealWalk {
    let mut w = RealWalk { last_time: i64::MIN, ..RealWalk::default() };
    if history.len() < 2 {
        return w;
    }

    for i in 0..history.len() {
        let Some(bucket) = history.bucket(i) else { break };

        w.last_time = bucket.end();
        let x = horiz.convert_to_point(w.last_time);
        let y = vert.convert_to_point(bytes_value(w.total));

        // skip until the first bucket on screen
        if i > 0 && !w.started && x > 0.0 {
            w.stroke.move_to((w.last_x, w.last_y));
            w.fill.move_to((w.last_x, w.last_y));
            w.started = true;
            w.first_x = w.last_x;
        }

        if w.started {
            w.stroke.line_to((x, y));
            w.fill.line_to((x, y));
            w.total = w.total.saturating_add(bucket.total_bytes());
        }

        if x > viewport.width {
            break;
        }

        w.last_x = x;
        w.last_y = y;
    }

    // hold flat out to the requested end time
    if let Some(end) = end_time {
        if w.last_time < end {
            w.last_x = horiz.convert_to_point(end);
            if w.started {
                w.stroke.line_to((w.last_x, w.last_y));
                w.fill.line_to((w.last_x, w.last_y));
            }
        }
    }

    if w.started {
        w.fill.line_to((w.last_x, viewport.height));
        w.fill.line_to((w.first_x, viewport.height));
    }

    w
}
