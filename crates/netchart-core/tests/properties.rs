// File: crates/netchart-core/tests/properties.rs
// Purpose: Invariants over generated histories: monotonic totals, baseline closure,
// forecast blend per step, and loop termination.

use netchart_core::forecast::{project, window_rate, ForecastStart};
use netchart_core::types::{DAY_MILLIS, HOUR_MILLIS, WEEK_MILLIS};
use netchart_core::{
    generate_curves, Axes, Bucket, DataScale, ForecastConfig, History, HistoryBuilder, SeriesState,
    TimeScale, UsageChart, UsageHistory, Viewport,
};

/// Deterministic pseudo-random byte counts (LCG), no external RNG needed.
fn noisy_history(n: i64, seed: u64) -> History {
    let mut s = seed;
    let buckets = (0..n)
        .map(|i| {
            s = s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let rx = (s >> 33) % 5_000;
            let tx = (s >> 17) % 700;
            Bucket::new(i * HOUR_MILLIS, HOUR_MILLIS, rx, tx)
        })
        .collect();
    History::from_buckets(HOUR_MILLIS, buckets).expect("valid history")
}

/// Hourly buckets whose volume depends on the day of the week.
fn weekly_pattern(weeks: i64) -> History {
    let buckets = (0..weeks * 7 * 24)
        .map(|i| {
            let day = ((i / 24) % 7) as u64;
            Bucket::new(i * HOUR_MILLIS, HOUR_MILLIS, (day + 1) * 100, 0)
        })
        .collect();
    History::from_buckets(HOUR_MILLIS, buckets).expect("valid history")
}

#[test]
fn totals_never_decrease() {
    for seed in [1u64, 7, 42, 1234] {
        let h = noisy_history(24 * 30, seed);
        let time = TimeScale::new(10 * DAY_MILLIS, 40 * DAY_MILLIS, 800.0);
        let data = DataScale::new(0, 10_000_000, 400.0);
        let state = SeriesState {
            end_time: Some(40 * DAY_MILLIS),
            estimate_visible: true,
            ..SeriesState::default()
        };
        let axes = Axes::new(&time, &data);
        let viewport = Viewport::new(800.0, 400.0);
        let c = generate_curves(Some(&h), &state, axes, viewport, 0, &ForecastConfig::default())
            .expect("generate");

        // inverted data axis: larger totals sit higher (smaller y)
        let ys: Vec<f32> = c.stroke.points().map(|p| p.y).collect();
        assert!(ys.windows(2).all(|w| w[1] <= w[0]), "seed {seed}: stroke y must not go back down");
        let es: Vec<f32> = c.estimate.points().map(|p| p.y).collect();
        assert!(
            es.windows(2).all(|w| w[1] <= w[0]),
            "seed {seed}: estimate y must not go back down"
        );
        assert!(c.max_estimate >= c.max_real);
        assert!(c.max_real > 0);
    }
}

#[test]
fn fill_closes_on_baseline() {
    let h = noisy_history(24 * 10, 99);
    let time = TimeScale::new(2 * DAY_MILLIS, 12 * DAY_MILLIS, 500.0);
    let data = DataScale::new(0, 5_000_000, 250.0);
    let viewport = Viewport::new(500.0, 250.0);
    let state = SeriesState::default();
    let axes = Axes::new(&time, &data);
    let c = generate_curves(Some(&h), &state, axes, viewport, 0, &ForecastConfig::default())
        .expect("generate");

    let fill: Vec<_> = c.fill.points().collect();
    let n = fill.len();
    assert!(n >= 4);
    assert_eq!(fill[n - 1].y, viewport.height);
    assert_eq!(fill[n - 2].y, viewport.height);
    assert_eq!(fill[n - 1].x, fill[0].x);
    assert_eq!(c.stroke.first(), c.fill.first());
}

#[test]
fn each_forecast_step_blends_long_and_short_rates() {
    let h = weekly_pattern(3);
    let last = h.end().unwrap();
    let d = h.bucket_duration();
    let config = ForecastConfig::default();
    let horiz = move |t: i64| ((t - last) / HOUR_MILLIS) as f32;
    let vert = |b: i64| b as f32;
    let from = ForecastStart { x: 0.0, y: 0.0, time: last, total: 0 };
    let viewport = Viewport::new(30.0, 10.0);
    let est = project(&h, &horiz, &vert, viewport, from, i64::MAX, &config).expect("project");
    assert_eq!(est.steps, 30);

    let long = window_rate(&h, last - 2 * WEEK_MILLIS, last, i64::MAX, d);
    assert_eq!(long, 400);

    let ys: Vec<f32> = est.path.points().map(|p| p.y).collect();
    let mut seen_distinct = false;
    for k in 1..=30i64 {
        let anchor = last - WEEK_MILLIS + (k * d) % WEEK_MILLIS;
        let short = window_rate(&h, anchor - DAY_MILLIS, anchor, i64::MAX, d);
        seen_distinct |= short != long;
        let delta = (long * 7 + short * 3) / 10;
        let step = ys[k as usize] - ys[k as usize - 1];
        assert_eq!(step as u64, delta, "step {k}");
    }
    assert!(seen_distinct, "pattern should make the short window differ");
}

#[test]
fn forecast_terminates_for_any_positive_bucket() {
    for bucket in [1, 1_000, HOUR_MILLIS, DAY_MILLIS] {
        let mut b = HistoryBuilder::new(bucket).unwrap();
        b.record(0, 3 * bucket, 900, 90).unwrap();
        let h = b.build();
        for width in [0.0f32, 1.0, 333.0, 4096.0] {
            let end = h.end().unwrap();
            let time = TimeScale::new(0, end + 10 * bucket, width);
            let data = DataScale::new(0, 10_000, 100.0);
            let state = SeriesState::default();
            let axes = Axes::new(&time, &data);
            let viewport = Viewport::new(width, 100.0);
            let c = generate_curves(Some(&h), &state, axes, viewport, 0, &ForecastConfig::default())
                .expect("generate");
            let last = c.estimate.last().expect("estimate starts at last real point");
            assert!(last.x >= width || c.estimate.len() == 1 + ForecastConfig::default().max_steps);
        }
    }
}

#[test]
fn chart_two_pass_end_to_end() {
    // five weeks of morning traffic, three weeks shown, nine days of estimate
    let mut b = HistoryBuilder::new(HOUR_MILLIS).unwrap();
    for day in 0..35 {
        let start = day * DAY_MILLIS + 8 * HOUR_MILLIS;
        b.record(start, start + 4 * HOUR_MILLIS, 40_000_000, 4_000_000).unwrap();
    }
    let history = b.build();
    let total = history.total_bytes();
    let last = history.end().unwrap();

    let width = 600.0;
    let mut chart = UsageChart::new(Viewport::default());
    chart.set_viewport(Viewport::new(width, 300.0));
    chart.set_time_range(last - 21 * DAY_MILLIS, last + 9 * DAY_MILLIS);
    chart.bind(history);
    chart.series.set_end_time(last);
    chart.series.set_primary_range(last - WEEK_MILLIS, last);
    chart.series.set_estimate_visible(true);

    let top = chart.autoscale(last).expect("autoscale");
    assert!(chart.series.max_real() > 0);
    assert!(chart.series.max_real() <= total);
    assert!(chart.series.max_estimate() > chart.series.max_real());
    assert!(top >= chart.series.max_estimate() as i64);

    // the estimate starts where the data ends and runs to the right edge
    let est = chart.series.estimate();
    assert!(est.len() > 1, "estimate has {} points", est.len());
    let first = est.first().unwrap();
    assert!((first.x - width * 21.0 / 30.0).abs() < 0.5, "estimate starts at x={}", first.x);
    assert!(est.last().unwrap().x >= width);

    // everything fits inside the rescaled data axis
    assert!(chart.series.stroke().points().all(|p| p.y >= 0.0 && p.y <= 300.0));
    assert!(chart.series.estimate().points().all(|p| p.y >= -1e-3));

    let (l, r) = chart.series.primary_range_points(&chart.time);
    assert!(l < r);
}
