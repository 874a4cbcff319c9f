use log::{info, warn};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, RefreshKind, Signal, System};

/// Delivers termination requests to other processes.
pub trait Terminator {
    /// Sends the request and reports whether the OS accepted it. Does not wait
    /// for the target to exit.
    fn terminate(&mut self, pid: u32) -> bool;
}

/// Sends SIGTERM through sysinfo.
pub struct SysinfoTerminator {
    system: System,
}

impl SysinfoTerminator {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing().with_processes(ProcessRefreshKind::nothing());
        Self {
            system: System::new_with_specifics(refresh_kind),
        }
    }
}

impl Default for SysinfoTerminator {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminator for SysinfoTerminator {
    fn terminate(&mut self, pid: u32) -> bool {
        let pid = Pid::from_u32(pid);
        self.system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        let accepted = self
            .system
            .process(pid)
            .and_then(|process| process.kill_with(Signal::Term))
            .unwrap_or(false);

        if accepted {
            info!("sent SIGTERM to {}", pid);
        } else {
            warn!("SIGTERM to {} was not accepted", pid);
        }
        accepted
    }
}
