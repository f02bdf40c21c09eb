pub mod journal_month;
pub mod month_grid;
