use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Widget},
};

use crate::input::{InputState, KillOutcome, KillPrompt};

const COMMAND_PROMPT: &str = "Enter command: ";
const KILL_PROMPT: &str = "Enter PID to kill: ";

/// Two-line footer: the command hints and the prompt / outcome line.
pub struct CommandBarWidget<'a> {
    state: &'a InputState,
}

impl<'a> CommandBarWidget<'a> {
    pub fn new(state: &'a InputState) -> Self {
        Self { state }
    }

    /// Where the cursor belongs while a pid is being typed.
    pub fn cursor_position(&self, area: Rect) -> Option<Position> {
        match self.state {
            InputState::CommandEntry(KillPrompt::Reading { input }) => {
                let x = area.x + (KILL_PROMPT.len() + input.chars().count()) as u16;
                Some(Position::new(x.min(area.right().saturating_sub(1)), area.y + 1))
            }
            _ => None,
        }
    }

    fn prompt_line(&self) -> Line<'a> {
        match self.state {
            InputState::Monitor => Line::from(COMMAND_PROMPT),
            InputState::CommandEntry(KillPrompt::Reading { input }) => Line::from(vec![
                Span::styled(KILL_PROMPT, Style::new().fg(Color::Yellow)),
                Span::raw(input.as_str()),
            ]),
            InputState::CommandEntry(KillPrompt::Acknowledge(outcome)) => {
                let color = match outcome {
                    KillOutcome::Sent(_) => Color::Green,
                    KillOutcome::Failed(_) => Color::Red,
                };
                Line::from(Span::styled(outcome.message(), Style::new().fg(color)))
            }
        }
    }
}

impl Widget for CommandBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let key = Style::default().fg(Color::Green);

        let hints = Line::from(vec![
            Span::raw("Commands: "),
            Span::styled("q", key),
            Span::raw("=quit  "),
            Span::styled("s", key),
            Span::raw("=toggle sort (CPU/MEM/PID)  "),
            Span::styled("k", key),
            Span::raw("=kill <pid>"),
        ]);

        Paragraph::new(Text::from(vec![hints, self.prompt_line()])).render(area, buf);
    }
}
