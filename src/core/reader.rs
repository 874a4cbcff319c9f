use std::fs;
use std::path::{Path, PathBuf};

use log::{trace, warn};
use sysinfo::{MemoryRefreshKind, RefreshKind, System};

use super::error::ReadError;
use super::sample::{ProcessSample, Snapshot, SystemCounters};

const DEFAULT_TICKS_PER_SECOND: u64 = 100;
const DEFAULT_PAGE_SIZE: u64 = 4096;

/// `pid (comm) state ...` has at least this many fields when utime/stime are present.
const MIN_STAT_FIELDS: usize = 22;

/// Where process and system accounting data comes from.
///
/// Each call is an independent best-effort read, nothing is retried.
pub trait SnapshotSource {
    /// Pids of the processes alive right now.
    fn pids(&mut self) -> Vec<u32>;

    fn read_process(&mut self, pid: u32) -> Result<ProcessSample, ReadError>;

    /// Fields that cannot be read are reported as zero.
    fn read_counters(&mut self) -> SystemCounters;

    fn ticks_per_second(&self) -> u64;

    fn page_size(&self) -> u64;
}

/// Takes one point-in-time view of every process and the system counters.
///
/// Every enumerated pid yields exactly one sample; unreadable ones come back blank.
pub fn take_snapshot<S: SnapshotSource + ?Sized>(source: &mut S) -> Snapshot {
    let pids = source.pids();
    let mut processes = Vec::with_capacity(pids.len());

    for pid in pids {
        match source.read_process(pid) {
            Ok(sample) => processes.push(sample),
            Err(err) => {
                trace!("degraded read: {}", err);
                processes.push(ProcessSample::blank(pid));
            }
        }
    }

    Snapshot {
        processes,
        counters: source.read_counters(),
    }
}

/// Reads `/proc` directly; memory totals come from sysinfo.
pub struct ProcSource {
    root: PathBuf,
    system: System,
    ticks_per_second: u64,
    page_size: u64,
}

impl ProcSource {
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let refresh_kind = RefreshKind::nothing().with_memory(MemoryRefreshKind::everything());

        Self {
            root: root.into(),
            system: System::new_with_specifics(refresh_kind),
            ticks_per_second: sysconf_or(libc::_SC_CLK_TCK, DEFAULT_TICKS_PER_SECOND),
            page_size: sysconf_or(libc::_SC_PAGESIZE, DEFAULT_PAGE_SIZE),
        }
    }

    fn process_dir(&self, pid: u32) -> PathBuf {
        self.root.join(pid.to_string())
    }

    fn resident_pages(&self, dir: &Path) -> u64 {
        if let Some(pages) = read_first_line(&dir.join("statm"))
            .as_deref()
            .and_then(parse_statm_resident)
        {
            return pages;
        }

        fs::read_to_string(dir.join("status"))
            .ok()
            .and_then(|status| parse_status_vmrss_kb(&status))
            .map(|kb| kb * 1024 / self.page_size.max(1))
            .unwrap_or(0)
    }
}

impl Default for ProcSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotSource for ProcSource {
    fn pids(&mut self) -> Vec<u32> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("cannot enumerate {}: {}", self.root.display(), err);
                return Vec::new();
            }
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| parse_pid_dir(&entry.file_name().to_string_lossy()))
            .collect()
    }

    fn read_process(&mut self, pid: u32) -> Result<ProcessSample, ReadError> {
        let dir = self.process_dir(pid);

        let ticks = fs::read_to_string(dir.join("stat"))
            .map_err(|err| ReadError::from_io(pid, err))
            .and_then(|stat| {
                parse_stat_ticks(&stat).ok_or(ReadError::Malformed {
                    pid,
                    what: "stat fields",
                })
            });
        let name = read_first_line(&dir.join("comm"));
        let resident_pages = self.resident_pages(&dir);

        // nothing readable at all: the process is gone or off limits
        let ticks = match (ticks, name.is_some() || resident_pages > 0) {
            (Ok(ticks), _) => Some(ticks),
            (Err(err), true) => {
                trace!("keeping partial record: {}", err);
                None
            }
            (Err(err), false) => return Err(err),
        };

        Ok(ProcessSample {
            pid,
            name: name.unwrap_or_default(),
            cumulative_cpu_ticks: ticks,
            resident_pages,
        })
    }

    /// `/proc/stat` and `/proc/uptime` come from the root, memory from sysinfo
    /// for the host. Anything unreadable is zero.
    fn read_counters(&mut self) -> SystemCounters {
        let aggregate_cpu_ticks = match fs::read_to_string(self.root.join("stat")) {
            Ok(text) => parse_aggregate_ticks(&text).unwrap_or(0),
            Err(err) => {
                warn!("cannot read aggregate cpu ticks: {}", err);
                0
            }
        };

        let uptime_seconds = match read_first_line(&self.root.join("uptime")).as_deref().and_then(parse_uptime) {
            Some(uptime) => uptime,
            None => {
                warn!("cannot read uptime under {}", self.root.display());
                0.0
            }
        };

        self.system.refresh_memory();

        SystemCounters {
            aggregate_cpu_ticks,
            mem_total: self.system.total_memory(),
            mem_free: self.system.free_memory(),
            mem_available: self.system.available_memory(),
            uptime_seconds,
        }
    }

    fn ticks_per_second(&self) -> u64 {
        self.ticks_per_second
    }

    fn page_size(&self) -> u64 {
        self.page_size
    }
}

fn sysconf_or(name: libc::c_int, fallback: u64) -> u64 {
    // SAFETY: sysconf only queries a configuration value and has no side effects.
    let value = unsafe { libc::sysconf(name) };
    if value > 0 {
        value as u64
    } else {
        fallback
    }
}

fn read_first_line(path: &Path) -> Option<String> {
    let text = fs::read_to_string(path).ok()?;
    Some(text.lines().next().unwrap_or("").to_string())
}

/// `/proc` entries that are all digits are process directories.
pub fn parse_pid_dir(name: &str) -> Option<u32> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// utime + stime from a `/proc/<pid>/stat` line.
///
/// Fields are counted after the closing parenthesis of the command name, which
/// may itself contain spaces or parentheses.
pub fn parse_stat_ticks(stat: &str) -> Option<u64> {
    let close = stat.rfind(')')?;
    let rest: Vec<&str> = stat[close + 1..].split_whitespace().collect();

    // pid and comm are the two fields before `rest`
    if rest.len() + 2 < MIN_STAT_FIELDS {
        return None;
    }

    let utime: u64 = rest[11].parse().ok()?;
    let stime: u64 = rest[12].parse().ok()?;
    Some(utime.saturating_add(stime))
}

/// Resident page count, the second field of `/proc/<pid>/statm`.
pub fn parse_statm_resident(statm: &str) -> Option<u64> {
    statm.split_whitespace().nth(1)?.parse().ok()
}

/// `VmRSS` in kB from `/proc/<pid>/status`.
pub fn parse_status_vmrss_kb(status: &str) -> Option<u64> {
    status
        .lines()
        .find(|line| line.starts_with("VmRSS:"))?
        .split_whitespace()
        .nth(1)?
        .parse()
        .ok()
}

/// Sum of user..steal on the `cpu` line of `/proc/stat`.
pub fn parse_aggregate_ticks(stat: &str) -> Option<u64> {
    let line = stat.lines().next()?;
    let mut fields = line.split_whitespace();
    if fields.next()? != "cpu" {
        return None;
    }

    Some(
        fields
            .take(8)
            .filter_map(|field| field.parse::<u64>().ok())
            .fold(0u64, |total, ticks| total.saturating_add(ticks)),
    )
}

pub fn parse_uptime(line: &str) -> Option<f64> {
    line.split_whitespace().next()?.parse().ok()
}
