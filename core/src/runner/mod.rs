mod capture;
pub mod exit;
mod process;
mod traits;
mod types;

pub use capture::TailBuffer;
pub use process::TokioProcessRunner;
pub use traits::ProcessRunner;
pub use types::{CommandSpec, ProcessOutput};
