use std::time::Instant;

use log::debug;

use super::aggregate::{build_views, cpu_indicator, rank, ProcessView, SortMode};
use super::delta::{effective_interval, tick_delta, DeltaEngine};
use super::reader::{take_snapshot, SnapshotSource};
use super::sample::SystemCounters;

/// Everything one frame needs, ranked by the active sort mode.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub views: Vec<ProcessView>,
    pub counters: SystemCounters,
    /// Sum of per-process CPU percentages; may exceed 100.
    pub cpu_indicator: f64,
    pub interval_secs: f64,
}

/// The monitoring session: owns the prior tick state and the sort mode.
pub struct ProcessMonitor {
    source: Box<dyn SnapshotSource>,
    engine: DeltaEngine,
    sort_mode: SortMode,
    last_sample: Option<Instant>,
    prev_aggregate_ticks: Option<u64>,
    report: Report,
}

impl ProcessMonitor {
    pub fn new(source: Box<dyn SnapshotSource>) -> Self {
        Self {
            source,
            engine: DeltaEngine::new(),
            sort_mode: SortMode::default(),
            last_sample: None,
            prev_aggregate_ticks: None,
            report: Report::default(),
        }
    }

    /// Runs one snapshot -> delta -> rank cycle as of `now`.
    pub fn refresh_at(&mut self, now: Instant) {
        let elapsed = self.last_sample.map(|last| now.saturating_duration_since(last));
        let interval_secs = effective_interval(elapsed);
        self.last_sample = Some(now);

        let snapshot = take_snapshot(self.source.as_mut());
        let counters = snapshot.counters;

        let cpu = self.engine.advance(
            &snapshot.processes,
            interval_secs,
            self.source.ticks_per_second(),
        );
        let mut views = build_views(
            &snapshot.processes,
            &cpu,
            counters.mem_total,
            self.source.page_size(),
        );
        rank(&mut views, self.sort_mode);

        let aggregate_delta = self
            .prev_aggregate_ticks
            .map(|prev| tick_delta(prev, counters.aggregate_cpu_ticks))
            .unwrap_or(0);
        self.prev_aggregate_ticks = Some(counters.aggregate_cpu_ticks);

        // no system-wide progress means there is nothing meaningful to sum
        let indicator = if aggregate_delta > 0 { cpu_indicator(&views) } else { 0.0 };

        self.report = Report {
            views,
            counters,
            cpu_indicator: indicator,
            interval_secs,
        };

        debug!(
            "sampled {} processes ({} tracked) over {:.3}s, cpu indicator {:.2}, {} bytes free",
            self.report.views.len(),
            self.engine.tracked(),
            self.report.interval_secs,
            self.report.cpu_indicator,
            self.report.counters.mem_free
        );
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// Advances the sort mode and re-ranks the last report in place.
    pub fn cycle_sort_mode(&mut self) {
        self.sort_mode = self.sort_mode.next();
        rank(&mut self.report.views, self.sort_mode);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::sample::ProcessSample;
    use crate::core::testing::ScriptedSource;

    fn counters(aggregate_cpu_ticks: u64) -> SystemCounters {
        SystemCounters {
            aggregate_cpu_ticks,
            mem_total: 1000 * 4096,
            mem_free: 200 * 4096,
            mem_available: 400 * 4096,
            uptime_seconds: 60.0,
        }
    }

    fn monitor() -> ProcessMonitor {
        let source = ScriptedSource::new(100, 4096)
            .frame(
                vec![
                    ProcessSample::new(42, "busy", 100, 100),
                    ProcessSample::new(7, "idle", 500, 10),
                ],
                counters(1_000),
            )
            .frame(
                vec![
                    ProcessSample::new(42, "busy", 150, 100),
                    ProcessSample::new(7, "idle", 500, 10),
                    ProcessSample::new(99, "new", 9_000, 1),
                ],
                counters(1_100),
            );
        ProcessMonitor::new(Box::new(source))
    }

    #[test]
    fn second_sample_yields_cpu_percentages() {
        let mut monitor = monitor();
        let start = Instant::now();
        monitor.refresh_at(start);
        monitor.refresh_at(start + Duration::from_secs(1));

        let report = monitor.report();
        assert_eq!(report.views[0].pid, 42);
        assert!((report.views[0].cpu_pct - 50.0).abs() < 1e-9);
        assert!((report.views[0].mem_pct - 10.0).abs() < 1e-9);

        let new = report.views.iter().find(|v| v.pid == 99).unwrap();
        assert_eq!(new.cpu_pct, 0.0);
        assert!((report.cpu_indicator - 50.0).abs() < 1e-9);
    }

    #[test]
    fn first_sample_has_no_activity() {
        let mut monitor = monitor();
        monitor.refresh_at(Instant::now());

        let report = monitor.report();
        assert!(report.views.iter().all(|v| v.cpu_pct == 0.0));
        assert_eq!(report.cpu_indicator, 0.0);
        assert_eq!(report.interval_secs, 1.0);
    }

    #[test]
    fn failed_read_does_not_restart_the_counter() {
        let source = ScriptedSource::new(100, 4096)
            .frame(vec![ProcessSample::new(42, "long", 100_000, 10)], counters(1_000))
            .frame(vec![ProcessSample::blank(42)], counters(1_100))
            .frame(vec![ProcessSample::new(42, "long", 100_050, 10)], counters(1_200));
        let mut monitor = ProcessMonitor::new(Box::new(source));
        let start = Instant::now();

        monitor.refresh_at(start);
        monitor.refresh_at(start + Duration::from_secs(1));
        assert_eq!(monitor.report().views[0].cpu_pct, 0.0);
        assert_eq!(monitor.report().cpu_indicator, 0.0);

        monitor.refresh_at(start + Duration::from_secs(2));
        let report = monitor.report();
        assert!((report.views[0].cpu_pct - 50.0).abs() < 1e-9);
        assert!((report.cpu_indicator - 50.0).abs() < 1e-9);
    }

    #[test]
    fn cycling_sort_mode_reranks_without_resampling() {
        let mut monitor = monitor();
        let start = Instant::now();
        monitor.refresh_at(start);
        monitor.refresh_at(start + Duration::from_secs(1));

        monitor.cycle_sort_mode();
        assert_eq!(monitor.sort_mode(), SortMode::MemDesc);
        let pids: Vec<u32> = monitor.report().views.iter().map(|v| v.pid).collect();
        assert_eq!(pids, vec![42, 7, 99]);

        monitor.cycle_sort_mode();
        let pids: Vec<u32> = monitor.report().views.iter().map(|v| v.pid).collect();
        assert_eq!(pids, vec![7, 42, 99]);
        assert!((monitor.report().views[1].cpu_pct - 50.0).abs() < 1e-9);
    }
}
