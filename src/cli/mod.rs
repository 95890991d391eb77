//! Command-line interface.
//!
//! Parses the command tree and wires the orchestrator to terminal surfaces.

mod commands;
mod icons;
mod session;
mod terminal;

pub use commands::{is_verbose, run, Cli};
pub use session::{Session, Show};
pub use terminal::{
    ConsoleNotifier, ModalHandle, TerminalList, TerminalMap, TerminalModal, TerminalPicker,
};
