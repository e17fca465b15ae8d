//! Console handles used by the I/O builtins.

use std::io::{self, BufRead, BufReader, Cursor, Write};
use std::sync::{Arc, Mutex, PoisonError};

use fleaux_core::RuntimeError;

/// Input, output and process arguments seen by `In`, `Println`, `Printf` and
/// `GetArgs`.
///
/// Handles are `Send` so evaluation can move to its own thread.
pub struct Console {
    input: Box<dyn BufRead + Send>,
    output: Box<dyn Write + Send>,
    args: Vec<String>,
}

impl Console {
    pub fn new(input: Box<dyn BufRead + Send>, output: Box<dyn Write + Send>) -> Self {
        Self {
            input,
            output,
            args: Vec::new(),
        }
    }

    /// Console bound to the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(Box::new(BufReader::new(io::stdin())), Box::new(io::stdout()))
    }

    /// Console reading `input` and recording everything written.
    pub fn captured(input: &str) -> (Self, CapturedOutput) {
        let output = CapturedOutput::default();
        let console = Self::new(
            Box::new(Cursor::new(input.as_bytes().to_vec())),
            Box::new(output.clone()),
        );
        (console, output)
    }

    /// Set the values `GetArgs` returns.
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Read one line without its terminator.
    pub fn read_line(&mut self) -> Result<String, RuntimeError> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(io_error)?;
        if read == 0 {
            return Err(RuntimeError::Io {
                message: "unexpected end of input".into(),
            });
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    /// Write `text` followed by a newline.
    pub fn write_line(&mut self, text: &str) -> Result<(), RuntimeError> {
        writeln!(self.output, "{text}").map_err(io_error)?;
        self.output.flush().map_err(io_error)
    }
}

fn io_error(err: io::Error) -> RuntimeError {
    RuntimeError::Io {
        message: err.to_string(),
    }
}

/// Shared buffer behind [`Console::captured`].
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

impl CapturedOutput {
    /// Everything written so far.
    pub fn contents(&self) -> String {
        let buf = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Written lines.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
