//! The weekly report: aggregation of the working set into totals and flags,
//! the report page, and the submission endpoint.

mod charts;
mod report_page;
mod submit_endpoint;
mod summary;

pub use report_page::get_report_page;
pub use submit_endpoint::submit_report_endpoint;
pub use summary::{CategoryTotal, ExpenseSlice, MealAllowanceFlag, ReportSummary, summarise};
