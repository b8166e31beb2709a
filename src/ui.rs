//! Ratatui front-end for the playground inventory. The shell owns no data of
//! its own: it collects form input and prompt answers, hands them to the
//! inventory service or the report generator, and redraws from what they
//! return.

mod app;
mod forms;
mod helpers;
mod report_view;
mod terminal;

pub use app::App;
pub use terminal::run_app;
