//! Destinations for the solver's progress output.
//!
//! The verbose iteration table of the [active-set solver](crate::solver::ActiveSetSolver)
//! is written to a [`ConfigurablePrintTarget`].  Besides the usual stdout,
//! file and stream targets it can be captured in memory, discarded, or
//! forwarded line by line to the `log` facade.

use std::fs::File;
use std::io::{stdout, Error, ErrorKind, Result, Stdout, Write};

/// Where formatted output ends up
pub(crate) enum PrintTarget {
    Stdout(Stdout),
    File(File),
    Stream(Box<dyn Write + Send + Sync>),
    Buffer(Vec<u8>),
    // partial line not yet sent to the logger
    Log(Vec<u8>),
    Sink,
}

impl std::fmt::Debug for PrintTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PrintTarget::Stdout(_) => "Stdout",
            PrintTarget::File(_) => "File",
            PrintTarget::Stream(_) => "Stream",
            PrintTarget::Buffer(_) => "Buffer",
            PrintTarget::Log(_) => "Log",
            PrintTarget::Sink => "Sink",
        };
        write!(f, "PrintTarget::{name}")
    }
}

impl Default for PrintTarget {
    fn default() -> Self {
        PrintTarget::Stdout(stdout())
    }
}

impl Write for PrintTarget {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        match self {
            PrintTarget::Stdout(out) => out.write(buf),
            PrintTarget::File(file) => file.write(buf),
            PrintTarget::Stream(stream) => stream.write(buf),
            PrintTarget::Buffer(buffer) => {
                buffer.extend_from_slice(buf);
                Ok(buf.len())
            }
            PrintTarget::Log(pending) => {
                pending.extend_from_slice(buf);
                emit_log_lines(pending);
                Ok(buf.len())
            }
            PrintTarget::Sink => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> Result<()> {
        match self {
            PrintTarget::Stdout(out) => out.flush(),
            PrintTarget::File(file) => file.flush(),
            PrintTarget::Stream(stream) => stream.flush(),
            PrintTarget::Buffer(_) | PrintTarget::Log(_) | PrintTarget::Sink => Ok(()),
        }
    }
}

// send every complete line in `pending` to the logger, keeping the tail
fn emit_log_lines(pending: &mut Vec<u8>) {
    while let Some(end) = pending.iter().position(|&c| c == b'\n') {
        let line: Vec<u8> = pending.drain(..=end).collect();
        let line = String::from_utf8_lossy(&line[..end]);
        if !line.trim().is_empty() {
            log::info!("{}", line.trim_end());
        }
    }
}

/// Redirection of progress output, implemented by the solver
pub trait ConfigurablePrintTarget {
    /// print to stdout (the default)
    fn print_to_stdout(&mut self);
    /// print to a file
    fn print_to_file(&mut self, file: File);
    /// print to any boxed writer
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>);
    /// capture output in memory, see [`get_print_buffer`](Self::get_print_buffer)
    fn print_to_buffer(&mut self);
    /// forward each output line to `log::info!`
    fn print_to_log(&mut self);
    /// discard output
    fn print_to_sink(&mut self);
    /// output captured since the last call to [`print_to_buffer`](Self::print_to_buffer)
    fn get_print_buffer(&mut self) -> Result<String>;
}

impl ConfigurablePrintTarget for PrintTarget {
    fn print_to_stdout(&mut self) {
        *self = PrintTarget::Stdout(stdout());
    }

    fn print_to_file(&mut self, file: File) {
        *self = PrintTarget::File(file);
    }

    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        *self = PrintTarget::Stream(stream);
    }

    fn print_to_buffer(&mut self) {
        *self = PrintTarget::Buffer(Vec::new());
    }

    fn print_to_log(&mut self) {
        *self = PrintTarget::Log(Vec::new());
    }

    fn print_to_sink(&mut self) {
        *self = PrintTarget::Sink;
    }

    fn get_print_buffer(&mut self) -> Result<String> {
        match self {
            PrintTarget::Buffer(buffer) => Ok(String::from_utf8_lossy(buffer).into_owned()),
            _ => Err(Error::new(ErrorKind::Other, "output is not being buffered")),
        }
    }
}

#[test]
fn test_print_buffer() {
    let mut target = PrintTarget::default();
    assert!(target.get_print_buffer().is_err());

    target.print_to_buffer();
    write!(target, "active = {}", 3).unwrap();
    assert_eq!(target.get_print_buffer().unwrap(), "active = 3");

    target.print_to_sink();
    writeln!(target, "discarded").unwrap();
    assert!(target.get_print_buffer().is_err());
}

#[test]
fn test_log_lines() {
    let mut pending = b"  1  -2.5e-1\n  2  -3".to_vec();
    emit_log_lines(&mut pending);
    assert_eq!(pending, b"  2  -3");

    pending.extend_from_slice(b".0e-1\n\n");
    emit_log_lines(&mut pending);
    assert!(pending.is_empty());
}
