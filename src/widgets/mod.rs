pub mod command_bar;
pub mod process_table;
pub mod summary_block;
pub mod usage_bar;

pub use self::command_bar::CommandBarWidget;
pub use self::process_table::ProcessTableWidget;
pub use self::summary_block::SummaryWidget;
pub use self::usage_bar::UsageBarWidget;

/// Summary (3), two bars, a spacer, the table header and the footer (2).
pub const FIXED_CHROME_ROWS: u16 = 9;

/// Process rows that fit on a terminal `total_rows` high.
pub fn rows_available(total_rows: u16) -> usize {
    total_rows.saturating_sub(FIXED_CHROME_ROWS) as usize
}
