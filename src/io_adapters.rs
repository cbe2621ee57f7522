use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{Result as IoResult, Write};
use std::rc::Rc;

/// Source of user input lines.
///
/// `read_line` shows `prompt` and blocks until the user finishes a line.
/// The returned line carries no trailing newline.
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadlineError>;

    /// Remember a line for later recall. No-op by default.
    fn add_history(&mut self, _line: &str) -> Result<(), ReadlineError> {
        Ok(())
    }
}

/// Terminal line editor backed by `rustyline`.
pub struct EditorReader {
    editor: DefaultEditor,
}

impl EditorReader {
    pub fn new() -> Result<Self, ReadlineError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineReader for EditorReader {
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        self.editor.readline(prompt)
    }

    fn add_history(&mut self, line: &str) -> Result<(), ReadlineError> {
        self.editor.add_history_entry(line)?;
        Ok(())
    }
}

/// Replays a fixed list of lines, then reports end of input.
///
/// Every prompt it was asked to show is kept for inspection.
pub struct ScriptedReader {
    lines: VecDeque<String>,
    prompts: Rc<RefCell<Vec<String>>>,
}

impl ScriptedReader {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Convenience: create reader and return (reader, prompts_handle).
    pub fn with_handle<I, S>(lines: I) -> (Self, Rc<RefCell<Vec<String>>>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let reader = ScriptedReader::new(lines);
        let rc = reader.prompts.clone();
        (reader, rc)
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.lines.pop_front().ok_or(ReadlineError::Eof)
    }
}

/// Memory-backed writer for capturing console output.
#[derive(Default)]
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: create writer and return (writer, rc_handle).
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let mw = MemWriter::new();
        let rc = mw.buf.clone();
        (mw, rc)
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}
