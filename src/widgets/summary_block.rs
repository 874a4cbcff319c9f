use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Paragraph, Widget},
};

use crate::core::aggregate::SortMode;
use crate::core::monitor::Report;

const MB: f64 = 1024.0 * 1024.0;

pub fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / MB
}

/// Title, sort mode and the uptime / CPU / memory summary line.
pub struct SummaryWidget<'a> {
    report: &'a Report,
    sort_mode: SortMode,
}

impl<'a> SummaryWidget<'a> {
    pub fn new(report: &'a Report, sort_mode: SortMode) -> Self {
        Self { report, sort_mode }
    }
}

impl Widget for SummaryWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let counters = &self.report.counters;

        let text = Text::from(vec![
            Line::from(vec![
                Span::styled("procmon", Style::new().bold().fg(Color::Cyan)),
                Span::raw("  -  q:quit  k:kill  s:sort-mode"),
            ]),
            Line::from(vec![
                Span::raw("Sort: "),
                Span::styled(self.sort_mode.as_str(), Style::default().fg(Color::Yellow).bold()),
            ]),
            Line::from(format!(
                "Uptime: {:.1}s  CPU (sum processes): {:.2}%  Mem: {:.1}MB total  Avail: {:.1}MB",
                counters.uptime_seconds,
                self.report.cpu_indicator,
                megabytes(counters.mem_total),
                megabytes(counters.mem_available),
            )),
        ]);

        Paragraph::new(text).render(area, buf);
    }
}
