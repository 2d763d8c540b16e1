pub mod check;
pub mod cli;
pub mod list;
pub mod run;

use regcheck_core::api::{format_text, to_json, SessionReport};

use cli::OutputFormat;

pub(crate) fn print_session(report: &SessionReport, format: OutputFormat) {
    match format {
        OutputFormat::Text => print!("{}", format_text(report)),
        OutputFormat::Json => {
            let v = to_json(report);
            println!(
                "{}",
                serde_json::to_string_pretty(&v).unwrap_or_else(|_| v.to_string())
            );
        }
    }
}
