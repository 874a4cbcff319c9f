use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use log::debug;

use crate::core::monitor::ProcessMonitor;
use crate::core::signal::Terminator;

/// Longest pid string accepted at the kill prompt.
pub const MAX_PID_INPUT: usize = 31;

/// Source of operator key presses.
pub trait KeySource {
    /// Waits at most `timeout` for a key press, or blocks when `timeout` is
    /// `None`. A blocking read also returns `None` on a resize so the frame
    /// can be redrawn.
    fn next_key(&mut self, timeout: Option<Duration>) -> io::Result<Option<KeyEvent>>;
}

pub struct CrosstermKeys;

impl KeySource for CrosstermKeys {
    fn next_key(&mut self, timeout: Option<Duration>) -> io::Result<Option<KeyEvent>> {
        match timeout {
            Some(timeout) => {
                if !event::poll(timeout)? {
                    return Ok(None);
                }
                Ok(key_press(event::read()?))
            }
            None => loop {
                if let Some(wake) = blocking_wake(event::read()?) {
                    return Ok(wake);
                }
            },
        }
    }
}

fn key_press(event: Event) -> Option<KeyEvent> {
    match event {
        Event::Key(key_event) if key_event.kind == KeyEventKind::Press => Some(key_event),
        _ => None,
    }
}

/// Whether a blocking read should return for `event`, and with what.
fn blocking_wake(event: Event) -> Option<Option<KeyEvent>> {
    match event {
        Event::Resize(..) => Some(None),
        other => key_press(other).map(Some),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillOutcome {
    Sent(u32),
    Failed(u32),
}

impl KillOutcome {
    pub fn message(&self) -> String {
        match self {
            KillOutcome::Sent(pid) => format!("Sent SIGTERM to {}. Press any key to continue...", pid),
            KillOutcome::Failed(pid) => {
                format!("Failed to kill {} (check permissions). Press any key to continue...", pid)
            }
        }
    }
}

/// Progress through the kill sub-flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillPrompt {
    Reading { input: String },
    Acknowledge(KillOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputState {
    Monitor,
    CommandEntry(KillPrompt),
}

/// What the control loop must do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Quit,
    /// Entry action: blocking reads, visible cursor.
    EnterCommandEntry,
    /// Exit action: non-blocking reads, hidden cursor.
    LeaveCommandEntry,
}

pub struct InputController {
    state: InputState,
}

impl InputController {
    pub fn new() -> Self {
        Self {
            state: InputState::Monitor,
        }
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn is_command_entry(&self) -> bool {
        matches!(self.state, InputState::CommandEntry(_))
    }

    pub fn handle_key_event(
        &mut self,
        key_event: KeyEvent,
        monitor: &mut ProcessMonitor,
        terminator: &mut dyn Terminator,
    ) -> Transition {
        match &mut self.state {
            InputState::Monitor => self.handle_monitor_key(key_event, monitor),
            InputState::CommandEntry(KillPrompt::Reading { input }) => match key_event.code {
                KeyCode::Char(c) => {
                    if input.len() < MAX_PID_INPUT {
                        input.push(c);
                    }
                    Transition::Stay
                }
                KeyCode::Backspace => {
                    input.pop();
                    Transition::Stay
                }
                KeyCode::Esc => self.leave_command_entry(),
                KeyCode::Enter => match parse_pid(input) {
                    Some(pid) => {
                        let outcome = if terminator.terminate(pid) {
                            KillOutcome::Sent(pid)
                        } else {
                            KillOutcome::Failed(pid)
                        };
                        self.state = InputState::CommandEntry(KillPrompt::Acknowledge(outcome));
                        Transition::Stay
                    }
                    None => {
                        debug!("ignoring kill input {:?}", input);
                        self.leave_command_entry()
                    }
                },
                _ => Transition::Stay,
            },
            InputState::CommandEntry(KillPrompt::Acknowledge(_)) => self.leave_command_entry(),
        }
    }

    fn handle_monitor_key(&mut self, key_event: KeyEvent, monitor: &mut ProcessMonitor) -> Transition {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => Transition::Quit,
            KeyCode::Char('s') | KeyCode::Char('S') => {
                monitor.cycle_sort_mode();
                Transition::Stay
            }
            KeyCode::Char('k') | KeyCode::Char('K') => {
                debug!("entering command entry");
                self.state = InputState::CommandEntry(KillPrompt::Reading {
                    input: String::new(),
                });
                Transition::EnterCommandEntry
            }
            _ => Transition::Stay,
        }
    }

    fn leave_command_entry(&mut self) -> Transition {
        debug!("leaving command entry");
        self.state = InputState::Monitor;
        Transition::LeaveCommandEntry
    }
}

impl Default for InputController {
    fn default() -> Self {
        Self::new()
    }
}

/// A positive pid, or `None` for anything that should not be signalled.
///
/// The whole trimmed input must be a number; "12x" is rejected rather than
/// read as 12.
pub fn parse_pid(input: &str) -> Option<u32> {
    match input.trim().parse::<i32>() {
        Ok(pid) if pid > 0 => Some(pid as u32),
        _ => None,
    }
}
