//! Output channel for the `print` builtin.
//!
//! The interpreter writes through a [`PrintHandler`] so output can go to
//! stdout when running a program and into a buffer under test.

use parking_lot::Mutex;

/// Destination for `print` output.
pub trait PrintHandler {
    /// Write one line (with trailing newline).
    fn println(&self, msg: &str);
}

/// Default handler: writes to stdout.
#[derive(Default)]
pub struct StdoutPrintHandler;

impl PrintHandler for StdoutPrintHandler {
    fn println(&self, msg: &str) {
        println!("{msg}");
    }
}

/// Handler that captures output for assertions.
#[derive(Default)]
pub struct BufferPrintHandler {
    buffer: Mutex<String>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        BufferPrintHandler::default()
    }

    /// Everything printed so far.
    pub fn output(&self) -> String {
        self.buffer.lock().clone()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl PrintHandler for BufferPrintHandler {
    fn println(&self, msg: &str) {
        let mut buffer = self.buffer.lock();
        buffer.push_str(msg);
        buffer.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn buffer_handler_captures_lines() {
        let handler = BufferPrintHandler::new();
        handler.println("1");
        handler.println("two");
        assert_eq!(handler.output(), "1\ntwo\n");
        handler.clear();
        assert_eq!(handler.output(), "");
    }
}
