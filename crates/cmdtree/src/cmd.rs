use std::io::{self, Write};
use std::rc::Rc;

use crate::command::Command;
use crate::group::CommandGroup;
use crate::output::LogOutput;

/// Handle to a node of a command tree.
///
/// Cloning is cheap and shares the node, so one command can be attached to
/// several groups.
#[derive(Clone)]
pub enum Cmd {
    Leaf(Rc<Command>),
    Group(Rc<CommandGroup>),
}

impl Cmd {
    pub fn description(&self) -> &str {
        match self {
            Self::Leaf(cmd) => cmd.description(),
            Self::Group(group) => group.description(),
        }
    }

    /// Run with the process arguments, writing diagnostics to stderr.
    pub fn main(&self) -> i32 {
        self.main_with(LogOutput::StdErr)
    }

    /// Run with the process arguments (program name stripped).
    pub fn main_with(&self, log_output: LogOutput) -> i32 {
        let args: Vec<String> = std::env::args().skip(1).collect();
        self.execute(log_output, &args)
    }

    /// Parse `args` and dispatch, returning the exit status: 0 on success or
    /// when help was shown, 1 on any parse, dispatch or handler error.
    pub fn execute(&self, log_output: LogOutput, args: &[String]) -> i32 {
        let mut out = log_output.writer();
        match self.execute_to(&mut *out, args) {
            Ok(code) => code,
            Err(err) => {
                tracing::warn!(%err, ?log_output, "failed to write command output");
                1
            }
        }
    }

    /// Like [`Cmd::execute`], writing help and error text to `out`.
    pub fn execute_to(&self, out: &mut dyn Write, args: &[String]) -> io::Result<i32> {
        let code = match self {
            Self::Leaf(cmd) => cmd.execute(out, args)?,
            Self::Group(group) => group.execute(out, args)?,
        };
        out.flush()?;
        Ok(code)
    }
}
