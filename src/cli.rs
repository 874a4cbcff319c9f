use clap::Command;

fn command() -> Command {
    Command::new("procmon")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interactive process monitor: CPU and memory per process, live")
        .after_help("Keys while running: q quit, s cycle sort (CPU/MEM/PID), k send SIGTERM to a pid")
}

/// There are no options; this only answers `--help` and `--version`.
pub fn parse_args() {
    command().get_matches();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_no_flags() {
        assert!(command().try_get_matches_from(["procmon"]).is_ok());
        assert!(command().try_get_matches_from(["procmon", "--interval", "5"]).is_err());
    }
}
