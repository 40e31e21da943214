use std::fmt;
use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};

use adviter::{AsyncSeqExt, PoolConfig, WorkerPool, when_all};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Occurrence checks over one run's values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub total: usize,
    pub bigger: usize,
    pub threshold_drawn: bool,
    pub threshold_drawn_once: bool,
    pub bigger_at_most_half: bool,
}

/// Computes the report on a dedicated worker pool, then shuts the pool down.
pub fn run(values: Vec<i32>, threshold: i32) -> Result<Report> {
    let pool = WorkerPool::new(&PoolConfig::default()).context("Failed to start worker pool")?;
    let scheduler = pool.scheduler();

    let total = values.len();
    let bigger_flags: Vec<bool> = values.iter().map(|n| *n > threshold).collect();
    let bigger = bigger_flags.iter().filter(|flag| **flag).count();
    let half = i64::try_from(total / 2).context("Too many values for the occurrence checks")?;
    let drawn = values.clone();

    let checks = pool
        .block_on(when_all([
            drawn.contains_at_least_async(&scheduler, threshold, 1),
            values.contains_exactly_async(&scheduler, threshold, 1),
            bigger_flags.contains_at_most_async(&scheduler, true, half),
        ]))
        .context("Occurrence checks failed")?;
    pool.shutdown(SHUTDOWN_TIMEOUT);

    Ok(Report {
        total,
        bigger,
        threshold_drawn: checks[0],
        threshold_drawn_once: checks[1],
        bigger_at_most_half: checks[2],
    })
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---")?;
        writeln!(f, "Values: {}", self.total)?;
        writeln!(f, "Bigger: {}", self.bigger)?;
        writeln!(f, "Threshold drawn: {}", self.threshold_drawn)?;
        let once = self.threshold_drawn_once;
        writeln!(f, "Threshold drawn exactly once: {once}")?;
        let at_most_half = self.bigger_at_most_half;
        write!(f, "Bigger values at most half: {at_most_half}")
    }
}

pub fn write_report<W: Write>(report: &Report, out: &mut W) -> Result<()> {
    writeln!(out, "{report}").context("Failed to write summary")
}
