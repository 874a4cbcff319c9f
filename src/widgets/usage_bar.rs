use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

pub const LABEL_WIDTH: usize = 24;
pub const MIN_BAR_WIDTH: u16 = 20;

const FILLED: &str = "▒";
const EMPTY: &str = " ";

/// Bar width for a terminal `cols` wide: a third of it, never below the minimum.
pub fn bar_width(cols: u16) -> u16 {
    MIN_BAR_WIDTH.max(cols / 3)
}

/// `round(clamp(fraction, 0, 1) * width)`. NaN counts as empty.
pub fn filled_cells(fraction: f64, width: u16) -> u16 {
    let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    (fraction * width as f64).round() as u16
}

/// A labelled horizontal bar with optional trailing text.
pub struct UsageBarWidget<'a> {
    label: &'a str,
    fraction: f64,
    width: u16,
    trailer: Option<String>,
    color: Color,
}

impl<'a> UsageBarWidget<'a> {
    pub fn new(label: &'a str, fraction: f64, width: u16) -> Self {
        Self {
            label,
            fraction,
            width,
            trailer: None,
            color: Color::Green,
        }
    }

    pub fn with_trailer(mut self, trailer: String) -> Self {
        self.trailer = Some(trailer);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Widget for UsageBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let filled = filled_cells(self.fraction, self.width) as usize;
        let empty = self.width as usize - filled;

        let mut spans = vec![
            Span::raw(format!("{:<width$}", self.label, width = LABEL_WIDTH)),
            Span::styled(FILLED.repeat(filled), Style::default().fg(self.color)),
            Span::raw(EMPTY.repeat(empty)),
        ];

        if let Some(trailer) = self.trailer {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(trailer, Style::default().fg(Color::Gray)));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
