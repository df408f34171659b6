use serde::Serialize;
use std::time::{Duration, Instant};

/// Run a function and measure its execution time.
///
/// # Returns
///
/// A tuple of (result, elapsed_time)
pub fn time_fn<F, R>(f: F) -> (R, Duration)
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

/// Summary of repeated timings, in milliseconds.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TimingStats {
    pub runs: usize,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl TimingStats {
    /// `None` for an empty list.
    pub fn from_durations(durations: &[Duration]) -> Option<Self> {
        if durations.is_empty() {
            return None;
        }
        let ms: Vec<f64> = durations.iter().map(|d| d.as_secs_f64() * 1000.0).collect();
        Some(Self {
            runs: ms.len(),
            mean_ms: ms.iter().sum::<f64>() / ms.len() as f64,
            min_ms: ms.iter().copied().fold(f64::INFINITY, f64::min),
            max_ms: ms.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

/// Call `f` `runs` times, keeping the last result and the timing summary.
pub fn repeat_timed<F, R>(runs: usize, mut f: F) -> Option<(R, TimingStats)>
where
    F: FnMut() -> R,
{
    let mut last = None;
    let mut durations = Vec::with_capacity(runs);
    for _ in 0..runs {
        let (result, elapsed) = time_fn(&mut f);
        durations.push(elapsed);
        last = Some(result);
    }
    Some((last?, TimingStats::from_durations(&durations)?))
}
