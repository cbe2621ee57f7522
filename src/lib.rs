//! Console and configuration I/O for a teletype-style management shell.
//!
//! This crate renders the prompt shown before each command (host name, current
//! module and privilege mode) and loads the YAML descriptors of the shell's
//! command modules from a configuration directory. Command dispatch lives
//! elsewhere; it talks to this crate through [`IoControl`] and keeps the
//! session state in a [`Status`].

pub mod config;
mod io_adapters;
mod io_control;
pub mod prompt;
mod status;

pub use config::{ConfigError, ConfigLoader, DescriptorDocument};
pub use io_adapters::{EditorReader, LineReader, MemWriter, ScriptedReader};
/// Just a convenient re-export of the I/O façade.
///
/// See [`IoControl`] for the high-level API and examples.
pub use io_control::{IoControl, Paths};
pub use prompt::PromptRenderer;
pub use status::Status;
