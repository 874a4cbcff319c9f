use std::cmp::Ordering;

use super::sample::ProcessSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    CpuDesc,
    MemDesc,
    PidAsc,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            SortMode::CpuDesc => SortMode::MemDesc,
            SortMode::MemDesc => SortMode::PidAsc,
            SortMode::PidAsc => SortMode::CpuDesc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::CpuDesc => "CPU %",
            SortMode::MemDesc => "MEM %",
            SortMode::PidAsc => "PID",
        }
    }

    fn compare(self, a: &ProcessView, b: &ProcessView) -> Ordering {
        match self {
            SortMode::CpuDesc => b.cpu_pct.total_cmp(&a.cpu_pct).then_with(|| a.pid.cmp(&b.pid)),
            SortMode::MemDesc => b.mem_pct.total_cmp(&a.mem_pct).then_with(|| a.pid.cmp(&b.pid)),
            SortMode::PidAsc => a.pid.cmp(&b.pid),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessView {
    pub pid: u32,
    pub name: String,
    pub cpu_pct: f64,
    pub mem_pct: f64,
}

pub fn mem_percent(resident_bytes: u64, mem_total_bytes: u64) -> f64 {
    if mem_total_bytes == 0 {
        return 0.0;
    }
    resident_bytes as f64 / mem_total_bytes as f64 * 100.0
}

/// Joins samples with their CPU percentages and derives memory percentages.
pub fn build_views(samples: &[ProcessSample], cpu: &[f64], mem_total_bytes: u64, page_size: u64) -> Vec<ProcessView> {
    samples
        .iter()
        .zip(cpu)
        .map(|(sample, &cpu_pct)| ProcessView {
            pid: sample.pid,
            name: sample.name.clone(),
            cpu_pct,
            mem_pct: mem_percent(sample.resident_pages.saturating_mul(page_size), mem_total_bytes),
        })
        .collect()
}

pub fn rank(views: &mut [ProcessView], mode: SortMode) {
    views.sort_by(|a, b| mode.compare(a, b));
}

/// Sum of per-process CPU percentages.
///
/// This is a coarse activity indicator, not system utilisation: it exceeds
/// 100 on multi-core machines and wobbles with sampling noise.
pub fn cpu_indicator(views: &[ProcessView]) -> f64 {
    views.iter().map(|view| view.cpu_pct).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(pid: u32, cpu_pct: f64, mem_pct: f64) -> ProcessView {
        ProcessView {
            pid,
            name: format!("p{}", pid),
            cpu_pct,
            mem_pct,
        }
    }

    fn sample_views() -> Vec<ProcessView> {
        vec![
            view(30, 5.0, 1.0),
            view(10, 20.0, 1.0),
            view(20, 5.0, 7.5),
            view(5, 0.0, 7.5),
            view(40, 20.0, 0.0),
        ]
    }

    fn pids(views: &[ProcessView]) -> Vec<u32> {
        views.iter().map(|v| v.pid).collect()
    }

    #[test]
    fn cpu_sort_is_descending_with_pid_tie_break() {
        let mut views = sample_views();
        rank(&mut views, SortMode::CpuDesc);
        assert_eq!(pids(&views), vec![10, 40, 20, 30, 5]);
        assert!(views.windows(2).all(|w| w[0].cpu_pct >= w[1].cpu_pct));
    }

    #[test]
    fn mem_sort_is_descending_with_pid_tie_break() {
        let mut views = sample_views();
        rank(&mut views, SortMode::MemDesc);
        assert_eq!(pids(&views), vec![5, 20, 10, 30, 40]);
    }

    #[test]
    fn pid_sort_is_strictly_ascending() {
        let mut views = sample_views();
        rank(&mut views, SortMode::PidAsc);
        assert_eq!(pids(&views), vec![5, 10, 20, 30, 40]);
    }

    #[test]
    fn sort_mode_cycles_through_all_three() {
        let mode = SortMode::default();
        assert_eq!(mode, SortMode::CpuDesc);
        assert_eq!(mode.next(), SortMode::MemDesc);
        assert_eq!(mode.next().next(), SortMode::PidAsc);
        assert_eq!(mode.next().next().next(), SortMode::CpuDesc);
    }

    #[test]
    fn memory_percent_guards_zero_total() {
        assert_eq!(mem_percent(123_456, 0), 0.0);
        assert_eq!(mem_percent(0, 0), 0.0);
    }

    #[test]
    fn hundred_of_thousand_megabytes_is_ten_percent() {
        let mb = 1024 * 1024;
        assert!((mem_percent(100 * mb, 1000 * mb) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn views_use_page_size_for_resident_bytes() {
        let samples = vec![ProcessSample::new(1, "a", 0, 25)];
        let views = build_views(&samples, &[12.5], 1000 * 4096, 4096);
        assert_eq!(views[0].cpu_pct, 12.5);
        assert!((views[0].mem_pct - 2.5).abs() < 1e-9);
    }

    #[test]
    fn indicator_may_exceed_one_hundred() {
        let views = vec![view(1, 90.0, 0.0), view(2, 80.0, 0.0)];
        assert_eq!(cpu_indicator(&views), 170.0);
        assert_eq!(cpu_indicator(&[]), 0.0);
    }
}
