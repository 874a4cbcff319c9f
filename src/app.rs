use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use log::info;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::Color;
use ratatui::{Frame, Terminal};

use crate::core::error::MonitorError;
use crate::core::monitor::ProcessMonitor;
use crate::core::signal::Terminator;
use crate::input::{InputController, KeySource, Transition};
use crate::widgets::summary_block::megabytes;
use crate::widgets::usage_bar::bar_width;
use crate::widgets::{rows_available, CommandBarWidget, ProcessTableWidget, SummaryWidget, UsageBarWidget};

pub const DEFAULT_TICK_RATE: Duration = Duration::from_millis(1000);

pub struct App {
    pub monitor: ProcessMonitor,
    pub controller: InputController,
    terminator: Box<dyn Terminator>,
    pub exit: bool,
    pub last_tick: Instant,
    pub tick_rate: Duration,
}

impl App {
    pub fn new(monitor: ProcessMonitor, terminator: Box<dyn Terminator>) -> Self {
        App {
            monitor,
            controller: InputController::new(),
            terminator,
            exit: false,
            last_tick: Instant::now(),
            tick_rate: DEFAULT_TICK_RATE,
        }
    }

    #[cfg(test)]
    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Runs until the operator quits.
    ///
    /// Each pass draws the latest report, then waits for a key only as long as
    /// the remaining sampling budget allows. In command entry the wait blocks
    /// and no samples are taken.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>, keys: &mut dyn KeySource) -> Result<(), MonitorError> {
        info!("monitoring started, sampling every {:?}", self.tick_rate);
        terminal.hide_cursor()?;
        self.tick();

        while !self.exit {
            terminal.draw(|frame| self.draw(frame))?;

            let key = if self.controller.is_command_entry() {
                keys.next_key(None)?
            } else {
                let timeout = self
                    .tick_rate
                    .checked_sub(self.last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);
                keys.next_key(Some(timeout))?
            };

            if let Some(key_event) = key {
                self.handle_key_event(key_event, terminal)?;
            }

            if !self.exit && !self.controller.is_command_entry() && self.last_tick.elapsed() >= self.tick_rate {
                self.tick();
            }
        }

        info!("monitoring stopped");
        Ok(())
    }

    fn tick(&mut self) {
        self.last_tick = Instant::now();
        self.monitor.refresh_at(self.last_tick);
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let report = self.monitor.report();

        let [summary_area, cpu_area, mem_area, _, table_area, footer_area] = Layout::vertical([
            Constraint::Length(3), // Title, sort mode, summary line
            Constraint::Length(1), // CPU bar
            Constraint::Length(1), // Memory bar
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Process table
            Constraint::Length(2), // Command hints + prompt
        ])
        .areas(area);

        let width = bar_width(area.width);

        frame.render_widget(SummaryWidget::new(report, self.monitor.sort_mode()), summary_area);

        frame.render_widget(
            UsageBarWidget::new("CPU bar (sum processes):", report.cpu_indicator / 100.0, width),
            cpu_area,
        );

        let counters = &report.counters;
        let mem_fraction = counters.mem_used_fraction();
        let used_bytes = counters.mem_total.saturating_sub(counters.mem_available);
        frame.render_widget(
            UsageBarWidget::new("Memory usage:", mem_fraction, width)
                .with_color(Color::Cyan)
                .with_trailer(format!(
                    "{:.1}/{:.1}MB ({:.1}%)",
                    megabytes(used_bytes),
                    megabytes(counters.mem_total),
                    mem_fraction * 100.0
                )),
            mem_area,
        );

        frame.render_widget(
            ProcessTableWidget::new(&report.views, rows_available(area.height)),
            table_area,
        );

        let command_bar = CommandBarWidget::new(self.controller.state());
        if let Some(position) = command_bar.cursor_position(footer_area) {
            frame.set_cursor_position(position);
        }
        frame.render_widget(command_bar, footer_area);
    }

    fn handle_key_event<B: Backend>(&mut self, key_event: KeyEvent, terminal: &mut Terminal<B>) -> Result<(), MonitorError> {
        let transition = self
            .controller
            .handle_key_event(key_event, &mut self.monitor, self.terminator.as_mut());

        match transition {
            Transition::Quit => self.exit(),
            Transition::EnterCommandEntry => terminal.show_cursor()?,
            Transition::LeaveCommandEntry => terminal.hide_cursor()?,
            Transition::Stay => {}
        }
        Ok(())
    }

    fn exit(&mut self) {
        self.exit = true
    }
}
