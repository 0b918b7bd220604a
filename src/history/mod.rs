//! The report history: archiving submitted reports and the page that lists
//! them.

pub mod archive;
mod history_page;

pub use history_page::get_history_page;
