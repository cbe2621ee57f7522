use crate::config::{self, ConfigError, ConfigLoader, DescriptorDocument};
use crate::io_adapters::LineReader;
use crate::prompt::{self, PromptRenderer};
use crate::status::Status;
use rustyline::error::ReadlineError;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

/// Width of the command column in command listings.
const COMMAND_COLUMN_WIDTH: usize = 30;

const WELCOME_MESSAGE: &str = "Hello, This is Python Teletype Shell.\n\
COPYRIGHT 2017 KyeongSeob Sim. ALL RIGHTS RESERVED.\n";

/// File system locations the shell reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub hostname_file: PathBuf,
    pub conf_dir: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            hostname_file: PathBuf::from(prompt::HOST_NAME_FILE_PATH),
            conf_dir: config::default_conf_dir(),
        }
    }
}

/// Single point of contact for console and configuration I/O.
///
/// Build one at startup and hand it to the dispatcher by reference. Input goes
/// through a [`LineReader`], output through any [`Write`] sink.
///
/// Example
/// ```
/// use ptysh::{IoControl, MemWriter, Paths, ScriptedReader, Status};
/// let paths = Paths {
///     hostname_file: "/nonexistent/hostname".into(),
///     conf_dir: "/nonexistent/ptysh.d".into(),
/// };
/// let (out, _buf) = MemWriter::with_handle();
/// let mut io = IoControl::new(paths, ScriptedReader::new(["show"]), out);
/// assert_eq!(io.get_input_command(&Status::new()).unwrap(), "show");
/// assert!(io.get_modules_conf().unwrap().is_none());
/// ```
pub struct IoControl {
    prompt: PromptRenderer,
    loader: ConfigLoader,
    reader: Box<dyn LineReader>,
    out: Box<dyn Write>,
}

impl IoControl {
    pub fn new(
        paths: Paths,
        reader: impl LineReader + 'static,
        out: impl Write + 'static,
    ) -> Self {
        Self {
            prompt: PromptRenderer::new(paths.hostname_file),
            loader: ConfigLoader::new(paths.conf_dir),
            reader: Box::new(reader),
            out: Box::new(out),
        }
    }

    /// Show the prompt for `status` and block until the user enters a line.
    ///
    /// End of input and interrupts are returned as errors for the caller to act on.
    pub fn get_input_command(&mut self, status: &Status) -> Result<String, ReadlineError> {
        let prompt = self.get_prompt(status)?;
        let line = self.reader.read_line(&prompt)?;
        if !line.trim().is_empty() {
            if let Err(e) = self.reader.add_history(&line) {
                debug!(error = %e, "failed to record history entry");
            }
        }
        Ok(line)
    }

    pub fn get_prompt(&self, status: &Status) -> io::Result<String> {
        self.prompt.render(status)
    }

    pub fn print_welcome_message(&mut self) -> io::Result<()> {
        self.print_message(WELCOME_MESSAGE)
    }

    /// One row of a command listing: name padded to a fixed column, then description.
    pub fn print_cmd_list(&mut self, command: &str, description: &str) -> io::Result<()> {
        let row = format!("  {command:<width$}{description}", width = COMMAND_COLUMN_WIDTH);
        self.print_message(&row)
    }

    pub fn print_cmd_usage(&mut self, usage: &str) -> io::Result<()> {
        self.print_message(&format!("  {usage}"))
    }

    pub fn print_message(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{message}")?;
        self.out.flush()
    }

    /// Scan the configuration directory. Every call rescans it.
    pub fn get_modules_conf(&self) -> Result<Option<Vec<DescriptorDocument>>, ConfigError> {
        self.loader.load_all()
    }
}
