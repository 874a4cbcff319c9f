//! In-memory collaborators for tests.

use std::collections::{HashSet, VecDeque};

use super::error::ReadError;
use super::reader::SnapshotSource;
use super::sample::{ProcessSample, SystemCounters};
use super::signal::Terminator;

/// Replays a fixed sequence of frames, one per snapshot. The last frame repeats.
pub struct ScriptedSource {
    frames: VecDeque<(Vec<ProcessSample>, SystemCounters)>,
    current: (Vec<ProcessSample>, SystemCounters),
    unreadable: HashSet<u32>,
    ticks_per_second: u64,
    page_size: u64,
}

impl ScriptedSource {
    pub fn new(ticks_per_second: u64, page_size: u64) -> Self {
        Self {
            frames: VecDeque::new(),
            current: (Vec::new(), SystemCounters::default()),
            unreadable: HashSet::new(),
            ticks_per_second,
            page_size,
        }
    }

    pub fn frame(mut self, processes: Vec<ProcessSample>, counters: SystemCounters) -> Self {
        self.frames.push_back((processes, counters));
        self
    }

    /// A pid that is enumerated but whose record cannot be read.
    pub fn with_unreadable(mut self, pid: u32) -> Self {
        self.unreadable.insert(pid);
        self
    }
}

impl SnapshotSource for ScriptedSource {
    fn pids(&mut self) -> Vec<u32> {
        if let Some(next) = self.frames.pop_front() {
            self.current = next;
        }
        let mut pids: Vec<u32> = self.current.0.iter().map(|p| p.pid).collect();
        let mut unreadable: Vec<u32> = self.unreadable.iter().copied().collect();
        unreadable.sort();
        pids.extend(unreadable);
        pids
    }

    fn read_process(&mut self, pid: u32) -> Result<ProcessSample, ReadError> {
        if self.unreadable.contains(&pid) {
            return Err(ReadError::Vanished(pid));
        }
        self.current
            .0
            .iter()
            .find(|p| p.pid == pid)
            .cloned()
            .ok_or(ReadError::Vanished(pid))
    }

    fn read_counters(&mut self) -> SystemCounters {
        self.current.1
    }

    fn ticks_per_second(&self) -> u64 {
        self.ticks_per_second
    }

    fn page_size(&self) -> u64 {
        self.page_size
    }
}

/// Records every termination request and answers with a fixed result.
pub struct RecordingTerminator {
    pub requests: Vec<u32>,
    pub accept: bool,
}

impl RecordingTerminator {
    pub fn accepting() -> Self {
        Self {
            requests: Vec::new(),
            accept: true,
        }
    }

    pub fn rejecting() -> Self {
        Self {
            requests: Vec::new(),
            accept: false,
        }
    }
}

impl Terminator for RecordingTerminator {
    fn terminate(&mut self, pid: u32) -> bool {
        self.requests.push(pid);
        self.accept
    }
}
