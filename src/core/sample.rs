/// One process as seen at a single instant.
///
/// Produced fresh by every snapshot and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    /// utime + stime since process start, `None` when the read failed.
    pub cumulative_cpu_ticks: Option<u64>,
    pub resident_pages: u64,
}

impl ProcessSample {
    pub fn new(pid: u32, name: impl Into<String>, cumulative_cpu_ticks: u64, resident_pages: u64) -> Self {
        Self {
            pid,
            name: name.into(),
            cumulative_cpu_ticks: Some(cumulative_cpu_ticks),
            resident_pages,
        }
    }

    /// Placeholder for a process whose accounting data could not be read.
    pub fn blank(pid: u32) -> Self {
        Self {
            pid,
            name: String::new(),
            cumulative_cpu_ticks: None,
            resident_pages: 0,
        }
    }
}

/// System-wide counters. Memory amounts are in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SystemCounters {
    pub aggregate_cpu_ticks: u64,
    pub mem_total: u64,
    pub mem_free: u64,
    pub mem_available: u64,
    pub uptime_seconds: f64,
}

impl SystemCounters {
    /// Fraction of memory in use (`total - available`), 0 when total is unknown.
    pub fn mem_used_fraction(&self) -> f64 {
        if self.mem_total == 0 {
            return 0.0;
        }
        let used = self.mem_total.saturating_sub(self.mem_available);
        used as f64 / self.mem_total as f64
    }
}

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub processes: Vec<ProcessSample>,
    pub counters: SystemCounters,
}
