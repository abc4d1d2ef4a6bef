use std::io::{self, Write};

/// Stream that help text and error messages are written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogOutput {
    StdOut,
    #[default]
    StdErr,
}

impl LogOutput {
    /// Unlocked handle: each write takes the stream lock on its own, so a
    /// handler may still use the stream from other threads.
    pub(crate) fn writer(self) -> Box<dyn Write> {
        match self {
            Self::StdOut => Box::new(io::stdout()),
            Self::StdErr => Box::new(io::stderr()),
        }
    }
}

/// Flushes `out` and the standard streams if dropped during a panic, so text
/// printed before a fatal handler failure is not lost.
pub(crate) struct FlushOnUnwind<'a> {
    out: &'a mut dyn Write,
}

impl<'a> FlushOnUnwind<'a> {
    pub(crate) fn new(out: &'a mut dyn Write) -> Self {
        Self { out }
    }
}

impl Drop for FlushOnUnwind<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let _ = self.out.flush();
            let _ = io::stdout().flush();
            let _ = io::stderr().flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn writer_does_not_hold_the_stream() {
        let mut out = LogOutput::StdErr.writer();
        writeln!(out, "before").unwrap();
        thread::spawn(|| eprintln!("from another thread"))
            .join()
            .unwrap();
        writeln!(out, "after").unwrap();
    }
}
