// File: crates/netchart-core/src/error.rs
// Summary: Error type shared by history construction and path generation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChartError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartError {
    #[error("nominal bucket duration must be positive, got {0} ms")]
    InvalidBucketDuration(i64),
    #[error("bucket {index} has non-positive duration {duration} ms")]
    EmptyBucket { index: usize, duration: i64 },
    #[error("bucket {index} starts at {start}, before previous bucket start {previous}")]
    UnorderedBucket { index: usize, start: i64, previous: i64 },
    #[error("bucket {index} starts at {start}, inside previous bucket ending at {previous_end}")]
    OverlappingBucket { index: usize, start: i64, previous_end: i64 },
    #[error("transfer interval [{start}, {end}) is reversed")]
    ReversedInterval { start: i64, end: i64 },
    #[error("viewport {width}x{height} must be finite and non-negative")]
    InvalidViewport { width: f32, height: f32 },
    #[error("invalid forecast config: {0}")]
    InvalidForecastConfig(&'static str),
}
