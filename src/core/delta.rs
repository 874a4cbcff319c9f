use std::collections::HashMap;
use std::time::Duration;

use super::sample::ProcessSample;

/// Intervals shorter than this are treated as a clock anomaly.
pub const MIN_INTERVAL_SECS: f64 = 0.001;
pub const FALLBACK_INTERVAL_SECS: f64 = 1.0;

/// Seconds between two samples, with the fallback substituted for anomalies.
pub fn effective_interval(elapsed: Option<Duration>) -> f64 {
    match elapsed.map(|d| d.as_secs_f64()) {
        Some(secs) if secs >= MIN_INTERVAL_SECS => secs,
        _ => FALLBACK_INTERVAL_SECS,
    }
}

/// Ticks consumed since `prior`; a counter that went backwards yields 0.
pub fn tick_delta(prior: u64, current: u64) -> u64 {
    current.saturating_sub(prior)
}

pub fn cpu_percent(delta_ticks: u64, ticks_per_second: u64, interval_secs: f64) -> f64 {
    if ticks_per_second == 0 || interval_secs <= 0.0 {
        return 0.0;
    }
    let proc_seconds = delta_ticks as f64 / ticks_per_second as f64;
    proc_seconds / interval_secs * 100.0
}

/// Turns successive cumulative tick counters into CPU percentages.
///
/// Keeps the last observed counter per pid. Pids missing from a snapshot are
/// dropped, so the map only ever holds processes that are still alive. A
/// reused pid is indistinguishable from the original process.
#[derive(Debug, Default)]
pub struct DeltaEngine {
    prior: HashMap<u32, u64>,
}

impl DeltaEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// CPU percentage for each sample, in input order, then remembers the
    /// new counters. Pids seen for the first time report 0. A sample whose
    /// counter could not be read also reports 0 and keeps its previous counter.
    pub fn advance(&mut self, samples: &[ProcessSample], interval_secs: f64, ticks_per_second: u64) -> Vec<f64> {
        let mut next = HashMap::with_capacity(samples.len());

        let percentages = samples
            .iter()
            .map(|sample| {
                let prior = self.prior.get(&sample.pid).copied();

                let Some(ticks) = sample.cumulative_cpu_ticks else {
                    if let Some(prior) = prior {
                        next.insert(sample.pid, prior);
                    }
                    return 0.0;
                };

                let delta = tick_delta(prior.unwrap_or(ticks), ticks);
                next.insert(sample.pid, ticks);
                cpu_percent(delta, ticks_per_second, interval_secs)
            })
            .collect();

        self.prior = next;
        percentages
    }

    #[cfg(test)]
    pub fn prior_ticks(&self, pid: u32) -> Option<u64> {
        self.prior.get(&pid).copied()
    }

    pub fn tracked(&self) -> usize {
        self.prior.len()
    }
}
