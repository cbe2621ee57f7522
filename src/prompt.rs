use crate::status::Status;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// System file holding the host name on its first line.
pub const HOST_NAME_FILE_PATH: &str = "/etc/hostname";

/// Shown in place of the host name when [`HOST_NAME_FILE_PATH`] is missing.
pub const DEFAULT_HOST_NAME: &str = "PTYSH";

/// Builds the prompt printed before every command read.
///
/// The host name is re-read on every render, so a rename of the machine shows
/// up at the next prompt.
#[derive(Debug, Clone)]
pub struct PromptRenderer {
    hostname_file: PathBuf,
}

impl PromptRenderer {
    pub fn new(hostname_file: impl Into<PathBuf>) -> Self {
        Self {
            hostname_file: hostname_file.into(),
        }
    }

    /// Resolve the host name and render the prompt for `status`.
    pub fn render(&self, status: &Status) -> io::Result<String> {
        let hostname = resolve_hostname(&self.hostname_file)?;
        Ok(render_prompt(&hostname, status))
    }
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new(HOST_NAME_FILE_PATH)
    }
}

/// Read the host name from the first line of `path`.
///
/// Only a missing file falls back to [`DEFAULT_HOST_NAME`]. A file that exists
/// but cannot be read, or is not valid UTF-8, is an error for the caller.
pub fn resolve_hostname(path: &Path) -> io::Result<String> {
    if !path.exists() {
        debug!(path = %path.display(), "hostname file missing, using default");
        return Ok(DEFAULT_HOST_NAME.to_string());
    }

    let mut reader = BufReader::new(File::open(path)?);
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;

    String::from_utf8(line.trim_ascii().to_vec())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// `(node)` while inside a module, empty at the root.
pub fn location_suffix(status: &Status) -> String {
    if status.is_root() {
        String::new()
    } else {
        format!("({})", status.current_node)
    }
}

pub fn delimiter(status: &Status) -> &'static str {
    if status.login { "#" } else { ">" }
}

/// Assemble `hostname + location + delimiter + " "`.
pub fn render_prompt(hostname: &str, status: &Status) -> String {
    format!(
        "{}{}{} ",
        hostname,
        location_suffix(status),
        delimiter(status)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn status(node: &str, depth: usize, login: bool) -> Status {
        Status {
            current_node: node.to_string(),
            module_depth: depth,
            login,
        }
    }

    fn hostname_file(content: &[u8]) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn test_root_has_no_location_suffix() {
        for login in [false, true] {
            let s = status("eth0", Status::ROOT_DEPTH, login);
            assert_eq!(location_suffix(&s), "");
            assert!(!render_prompt("host", &s).contains('('));
        }
    }

    #[test]
    fn test_nested_location_suffix() {
        for depth in 1..4 {
            let s = status("vlan10", depth, false);
            assert_eq!(location_suffix(&s), "(vlan10)");
        }
    }

    #[test]
    fn test_delimiter_follows_login_mode() {
        let user = render_prompt("h", &status("", 0, false));
        let admin = render_prompt("h", &status("", 0, true));

        assert!(user.ends_with("> ") && !user.contains('#'));
        assert!(admin.ends_with("# ") && !admin.contains('>'));
        assert!(!user.ends_with("  ") && !admin.ends_with("  "));
    }

    #[test]
    fn test_render_nested_privileged_prompt() {
        let f = hostname_file(b"router1\n");
        let renderer = PromptRenderer::new(f.path());

        let prompt = renderer.render(&status("eth0", 2, true)).unwrap();
        assert_eq!(prompt, "router1(eth0)# ");
    }

    #[test]
    fn test_render_default_hostname_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = PromptRenderer::new(dir.path().join("hostname"));

        let prompt = renderer.render(&status("", 0, false)).unwrap();
        assert_eq!(prompt, "PTYSH> ");
    }

    #[test]
    fn test_resolve_hostname_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let name = resolve_hostname(&dir.path().join("nope")).unwrap();
        assert_eq!(name, DEFAULT_HOST_NAME);
    }

    #[test]
    fn test_resolve_hostname_reads_first_line_only() {
        let f = hostname_file(b"  edge-01 \r\nsecond-line\n");
        assert_eq!(resolve_hostname(f.path()).unwrap(), "edge-01");
    }

    #[test]
    fn test_resolve_hostname_without_trailing_newline() {
        let f = hostname_file(b"core");
        assert_eq!(resolve_hostname(f.path()).unwrap(), "core");
    }

    #[test]
    fn test_resolve_hostname_invalid_utf8_errors() {
        let f = hostname_file(&[0xff, 0xfe, b'\n']);
        let err = resolve_hostname(f.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_resolve_hostname_directory_is_not_defaulted() {
        // exists, but reading it fails
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_hostname(dir.path()).is_err());
    }
}
