// File: crates/netchart-demo/src/main.rs
// Summary: Demo loads a usage history CSV (or synthesizes one), fits the chart in two passes,
// and writes the stroke, fill, and estimate outlines as CSV point lists.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{info, warn};
use netchart_core::types::{now_millis, DAY_MILLIS, HOUR_MILLIS, WEEK_MILLIS};
use netchart_core::{Bucket, History, HistoryBuilder, Path as Outline, UsageChart, Viewport};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Demo settings from positional args and environment.
struct DemoOptions {
    /// CSV input; `None` synthesizes a history.
    input: Option<PathBuf>,
    /// Days of real data shown left of the last sample.
    visible_days: i64,
    /// Days of estimate shown right of the last sample.
    estimate_days: i64,
    viewport: Viewport,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self { input: None, visible_days: 21, estimate_days: 9, viewport: Viewport::default() }
    }
}

impl DemoOptions {
    fn from_env() -> Result<Self> {
        let mut opts = Self::default();
        let mut args = std::env::args().skip(1);
        if let Some(raw) = args.next() {
            if raw != "--synthetic" {
                opts.input = Some(PathBuf::from(raw));
            }
        }
        if let Some(days) = args.next() {
            opts.visible_days = days.parse().with_context(|| format!("visible days '{days}'"))?;
        }
        if let Some(days) = args.next() {
            opts.estimate_days = days.parse().with_context(|| format!("estimate days '{days}'"))?;
        }
        if let Some(w) = env_f32("NETCHART_WIDTH")? {
            opts.viewport.width = w;
        }
        if let Some(h) = env_f32("NETCHART_HEIGHT")? {
            opts.viewport.height = h;
        }
        opts.viewport.validate()?;
        Ok(opts)
    }
}

fn env_f32(key: &str) -> Result<Option<f32>> {
    match std::env::var(key) {
        Ok(v) => Ok(Some(v.trim().parse().with_context(|| format!("{key}='{v}'"))?)),
        Err(_) => Ok(None),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let opts = DemoOptions::from_env()?;

    let history = match &opts.input {
        Some(path) => load_history_csv(path)
            .with_context(|| format!("failed to load CSV '{}'", path.display()))?,
        None => {
            println!("No input file, synthesizing five weeks of usage");
            synthesize(5)?
        }
    };
    println!("Loaded {} buckets, {} bytes total", history.as_slice().len(), history.total_bytes());

    let Some(last) = history.end() else {
        anyhow::bail!("history is empty, nothing to chart");
    };

    let mut chart = UsageChart::new(opts.viewport);
    let left = last - opts.visible_days * DAY_MILLIS;
    let right = last + opts.estimate_days * DAY_MILLIS;
    chart.set_time_range(left, right);
    chart.bind(history);
    // real data stops at the last sample so the estimate fills the right side
    let as_of = last.min(now_millis());
    chart.series.set_end_time(as_of);
    chart.series.set_primary_range(last - WEEK_MILLIS, last);
    chart.series.set_estimate_visible(true);

    let top = chart.autoscale(as_of)?;

    println!("Window {} .. {}", fmt_time(left), fmt_time(right));
    println!("Real total:     {}", chart.series.max_real());
    println!("Estimate total: {}", chart.series.max_estimate());
    println!("Data axis top:  {top}");
    let (pl, pr) = chart.series.primary_range_points(&chart.time);
    println!("Primary range:  x={pl:.1} .. {pr:.1}");
    if let Some(end) = chart.series.estimate().last() {
        let t = chart.time.from_px(end.x);
        println!("Estimate ends:  {} at ~{} bytes", fmt_time(t), chart.data.from_px(end.y));
    }

    let stem = opts
        .input
        .as_deref()
        .and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .unwrap_or("synthetic")
        .to_string();
    for (name, outline) in [
        ("stroke", chart.series.stroke()),
        ("fill", chart.series.fill()),
        ("estimate", chart.series.estimate()),
    ] {
        let out = out_name_with(&stem, name);
        write_outline_csv(outline, &out)?;
        println!("Wrote {} ({} points)", out.display(), outline.len());
    }

    Ok(())
}

/// Load `start,duration,rx,tx` rows. Header names are matched loosely and
/// rows are sorted by start before validation.
fn load_history_csv(path: &Path) -> Result<History> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr.headers()?.iter().map(|h| h.trim().to_lowercase()).collect::<Vec<_>>();
    info!("headers: {headers:?}");

    let idx = |names: &[&str]| headers.iter().position(|h| names.contains(&h.as_str()));
    let i_start = idx(&["start", "start_ms", "bucket_start", "time", "timestamp"])
        .context("missing start column")?;
    let i_dur = idx(&["duration", "duration_ms", "bucket_duration"])
        .context("missing duration column")?;
    let i_rx = idx(&["rx", "rx_bytes", "rxbytes"]).context("missing rx column")?;
    let i_tx = idx(&["tx", "tx_bytes", "txbytes"]).context("missing tx column")?;

    let mut buckets = Vec::new();
    for (row, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let field = |i: usize| rec.get(i).map(str::trim).unwrap_or("");
        let start = match parse_time_millis(field(i_start)) {
            Some(t) => t,
            None => {
                warn!("row {row}: unreadable start '{}', skipped", field(i_start));
                continue;
            }
        };
        let duration: i64 = field(i_dur).parse().with_context(|| format!("row {row}: duration"))?;
        let rx: u64 = field(i_rx).parse().with_context(|| format!("row {row}: rx"))?;
        let tx: u64 = field(i_tx).parse().with_context(|| format!("row {row}: tx"))?;
        buckets.push(Bucket::new(start, duration, rx, tx));
    }
    buckets.sort_by_key(|b| b.start);

    let nominal = nominal_duration(&buckets).unwrap_or(HOUR_MILLIS);
    info!("nominal bucket duration {nominal} ms");
    Ok(History::from_buckets(nominal, buckets)?)
}

/// Most common bucket duration.
fn nominal_duration(buckets: &[Bucket]) -> Option<i64> {
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for b in buckets {
        *counts.entry(b.duration).or_default() += 1;
    }
    counts.into_iter().max_by_key(|&(d, n)| (n, d)).map(|(d, _)| d)
}

/// Epoch milliseconds, epoch seconds, or RFC 3339.
fn parse_time_millis(s: &str) -> Option<i64> {
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        // epoch sec -> ms
        if n.abs() < 10_i64.pow(11) {
            return Some(n * 1000);
        }
        return Some(n);
    }
    DateTime::parse_from_rfc3339(s).ok().map(|t| t.timestamp_millis())
}

fn fmt_time(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Weekday-heavy usage with an evening peak, hourly buckets.
fn synthesize(weeks: i64) -> Result<History> {
    let mut b = HistoryBuilder::new(HOUR_MILLIS)?;
    for day in 0..weeks * 7 {
        let weekend = day % 7 >= 5;
        let base = if weekend { 80_000_000 } else { 200_000_000 };
        let day_start = day * DAY_MILLIS;
        b.record(day_start + 8 * HOUR_MILLIS, day_start + 18 * HOUR_MILLIS, base, base / 20)?;
        b.record(day_start + 19 * HOUR_MILLIS, day_start + 23 * HOUR_MILLIS, base * 2, base / 10)?;
    }
    Ok(b.build())
}

/// Produce output file name like target/out/outline_<stem>_<suffix>.csv
fn out_name_with(stem: &str, suffix: &str) -> PathBuf {
    let mut out = PathBuf::from("target/out");
    std::fs::create_dir_all(&out).ok();
    out.push(format!("outline_{stem}_{suffix}.csv"));
    out
}

fn write_outline_csv(outline: &Outline, path: &Path) -> Result<()> {
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(["x", "y"])?;
    for p in outline.points() {
        wtr.write_record([p.x.to_string(), p.y.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}
