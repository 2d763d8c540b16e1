//! Drives a test through configure → build → run → sanity → performance → report.

mod post;
mod pre;
mod run;
mod session;
mod types;

pub use post::check_output;
pub use run::run_test;
pub use session::run_session;
pub use types::{PhaseFailure, RunContext};
