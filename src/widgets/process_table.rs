use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Style, Stylize},
    widgets::{Cell, Row, Table, Widget},
};

use crate::core::aggregate::ProcessView;

pub const NAME_WIDTH: usize = 20;
const ELLIPSIS: &str = "...";

/// Blank names show the pid, long ones are cut with an ellipsis.
pub fn display_name(name: &str, pid: u32) -> String {
    if name.is_empty() {
        return format!("[{}]", pid);
    }
    if name.chars().count() > NAME_WIDTH {
        let kept: String = name.chars().take(NAME_WIDTH - ELLIPSIS.len()).collect();
        return format!("{}{}", kept, ELLIPSIS);
    }
    name.to_string()
}

/// Ranked processes under a one-line column header.
pub struct ProcessTableWidget<'a> {
    views: &'a [ProcessView],
    max_rows: usize,
}

impl<'a> ProcessTableWidget<'a> {
    pub fn new(views: &'a [ProcessView], max_rows: usize) -> Self {
        Self { views, max_rows }
    }
}

impl Widget for ProcessTableWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible_rows = self.max_rows.min(area.height.saturating_sub(1) as usize);

        let rows: Vec<Row> = self
            .views
            .iter()
            .take(visible_rows)
            .map(|view| {
                Row::new(vec![
                    Cell::from(view.pid.to_string()).style(Style::new().fg(Color::Green)),
                    Cell::from(display_name(&view.name, view.pid)),
                    Cell::from(format!("{:>8.2}", view.cpu_pct)),
                    Cell::from(format!("{:>8.2}", view.mem_pct)),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(6),                 // PID
            Constraint::Length(NAME_WIDTH as u16), // Name
            Constraint::Length(8),                 // CPU %
            Constraint::Length(8),                 // MEM %
        ];

        let table = Table::new(rows, widths).column_spacing(1).header(
            Row::new(vec![
                Cell::from("PID"),
                Cell::from("NAME"),
                Cell::from(format!("{:>8}", "CPU %")),
                Cell::from(format!("{:>8}", "MEM %")),
            ])
            .style(Style::new().bold().fg(Color::White)),
        );

        Widget::render(table, area, buf);
    }
}
