mod app;
mod cli;
mod core;
mod input;
mod logging;
mod widgets;

use app::App;
use cli::parse_args;
use crate::core::error::MonitorError;
use crate::core::monitor::ProcessMonitor;
use crate::core::reader::ProcSource;
use crate::core::signal::SysinfoTerminator;
use input::CrosstermKeys;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    parse_args();
    logging::init();

    let mut terminal = ratatui::try_init().map_err(MonitorError::TerminalInit)?;

    let monitor = ProcessMonitor::new(Box::new(ProcSource::new()));
    let app_result = App::new(monitor, Box::new(SysinfoTerminator::new()))
        .run(&mut terminal, &mut CrosstermKeys);

    ratatui::restore();

    app_result?;

    Ok(())
}
