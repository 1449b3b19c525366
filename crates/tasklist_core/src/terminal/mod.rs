//! The text-command front-end: a line goes in, display lines come out.
//!
//! A [`TerminalSession`] owns the output log, the command recall list and the
//! pending-interaction state. The task collection stays outside and is passed
//! in on every submission.

mod commands;
pub mod output;
pub mod parser;
pub mod pending;
pub mod recall;
mod session;

pub use output::{BANNER, OutputKind, OutputLine, OutputLog};
pub use parser::{ParsedCommand, parse_command};
pub use pending::PendingInteraction;
pub use recall::CommandRecall;
pub use session::{DEFAULT_MODE_SWITCH_DELAY, TerminalSession};
