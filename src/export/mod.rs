//! Downloads of a user's recorded data: the full transaction list as CSV
//! and individual archived reports as PDF.

mod csv;
mod pdf;

pub use csv::get_export_csv;
pub use pdf::get_report_pdf;
pub(crate) use pdf::{pdf_attachment, render_report_pdf};
