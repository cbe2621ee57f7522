use anyhow::{Context, Result};
use argh::FromArgs;
use ptysh::{EditorReader, IoControl, Paths, Status};
use rustyline::error::ReadlineError;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable overriding the descriptor directory.
const CONF_DIR_ENV: &str = "PTYSH_CONF_DIR";

#[derive(FromArgs)]
/// Teletype shell for managing a device through command modules.
struct Args {
    #[argh(option)]
    /// directory holding the module descriptor files. Defaults to $PTYSH_CONF_DIR,
    /// then to ../ptysh.d next to the executable.
    conf_dir: Option<PathBuf>,

    #[argh(option)]
    /// file whose first line is the host name shown in the prompt.
    hostname_file: Option<PathBuf>,

    #[argh(switch)]
    /// do not print the welcome banner.
    no_welcome: bool,
}

impl Args {
    fn paths(&self) -> Paths {
        let mut paths = Paths::default();
        if let Some(dir) = self
            .conf_dir
            .clone()
            .or_else(|| std::env::var_os(CONF_DIR_ENV).map(PathBuf::from))
        {
            paths.conf_dir = dir;
        }
        if let Some(file) = &self.hostname_file {
            paths.hostname_file = file.clone();
        }
        paths
    }
}

/// Reads `RUST_LOG`, defaults to `warn`. Logs go to stderr, away from the prompt.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args: Args = argh::from_env();

    let paths = args.paths();
    let reader = EditorReader::new().context("failed to initialise line editor")?;
    let mut io = IoControl::new(paths.clone(), reader, std::io::stdout());
    let status = Status::new();

    let modules = io
        .get_modules_conf()
        .with_context(|| format!("failed to load modules from {}", paths.conf_dir.display()))?;
    match &modules {
        Some(docs) => info!(count = docs.len(), "loaded module descriptors"),
        None => warn!(dir = %paths.conf_dir.display(), "no module configuration directory"),
    }

    if !args.no_welcome {
        io.print_welcome_message()?;
    }

    loop {
        match io.get_input_command(&status) {
            Ok(line) => {
                let command = line.trim();
                match command {
                    "" => continue,
                    "exit" | "quit" => break,
                    _ => io.print_message(&format!("command not found: {}", command))?,
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("failed to read command"),
        }
    }

    Ok(())
}
