use std::collections::BTreeMap;
use std::io::{self, Write};
use std::rc::Rc;

use crate::HELP_COMMAND;
use crate::cmd::Cmd;
use crate::error::BuildError;
use crate::help::{FlagDoc, render_docs};

const HELP_DESCRIPTION: &str = "Prints this help";

enum Entry {
    Cmd(Cmd),
    /// The injected `help` pseudo-command.
    Help,
}

/// Node that routes its first token to a named child.
pub struct CommandGroup {
    description: String,
    children: BTreeMap<String, Entry>,
}

impl CommandGroup {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn execute(&self, out: &mut dyn Write, args: &[String]) -> io::Result<i32> {
        let Some((name, rest)) = args.split_first() else {
            writeln!(out, "No arguments given")?;
            self.print_help(out)?;
            return Ok(1);
        };

        match self.children.get(name) {
            None => {
                writeln!(out, "Unknown command: {name}")?;
                self.print_help(out)?;
                Ok(1)
            }
            Some(Entry::Help) => {
                self.print_help(out)?;
                Ok(0)
            }
            Some(Entry::Cmd(cmd)) => {
                tracing::debug!(command = %name, args = rest.len(), "dispatching");
                cmd.execute_to(out, rest)
            }
        }
    }

    pub(crate) fn print_help(&self, out: &mut dyn Write) -> io::Result<()> {
        let docs: Vec<FlagDoc> = self
            .children
            .iter()
            .map(|(name, entry)| {
                let description = match entry {
                    Entry::Cmd(cmd) => cmd.description(),
                    Entry::Help => HELP_DESCRIPTION,
                };
                FlagDoc::new(name.as_str(), Some(description.to_string()))
            })
            .collect();
        writeln!(out, "{}", self.description)?;
        writeln!(out)?;
        writeln!(out, "Available commands:")?;
        out.write_all(render_docs(&docs).as_bytes())
    }
}

/// Collects the children of a command group.
///
/// ```
/// use cmdtree::{CommandBuilder, GroupBuilder, LogOutput};
///
/// let build = CommandBuilder::new("Build the project").run(|| Ok(())).unwrap();
/// let app = GroupBuilder::new("Project tool").cmd("build", build).build().unwrap();
/// assert_eq!(app.execute(LogOutput::StdErr, &["build".to_string()]), 0);
/// assert_eq!(app.execute(LogOutput::StdErr, &["run".to_string()]), 1);
/// ```
pub struct GroupBuilder {
    description: String,
    children: Vec<(String, Cmd)>,
}

impl GroupBuilder {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            children: Vec::new(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn cmd(mut self, name: impl Into<String>, command: Cmd) -> Self {
        self.children.push((name.into(), command));
        self
    }

    pub fn build(self) -> Result<Cmd, BuildError> {
        let mut children = BTreeMap::new();
        children.insert(HELP_COMMAND.to_string(), Entry::Help);
        for (name, command) in self.children {
            if name.is_empty() {
                return Err(BuildError::EmptyCommandName);
            }
            if name == HELP_COMMAND {
                return Err(BuildError::ReservedCommand(name));
            }
            if children.contains_key(&name) {
                return Err(BuildError::DuplicateCommand(name));
            }
            children.insert(name, Entry::Cmd(command));
        }
        Ok(Cmd::Group(Rc::new(CommandGroup {
            description: self.description,
            children,
        })))
    }
}
