pub mod expense_line;
pub mod expense_report;
pub mod holiday;
pub mod km_rate;
pub mod leave;
pub mod project;
pub mod user;
