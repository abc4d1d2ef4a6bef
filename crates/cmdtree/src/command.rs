use std::io::{self, Write};
use std::rc::Rc;

use crate::HELP_FLAG;
use crate::flag::{AnonFlag, BooleanFlag, NamedFlag};
use crate::help::{FlagDoc, render_docs};
use crate::output::FlushOnUnwind;
use crate::parser::parse_args;

/// Body of a leaf command.
///
/// Returning `Err` is a recoverable failure: it is printed and mapped to exit
/// status 1. A panic is fatal and propagates past the dispatcher untouched.
pub type Handler = Box<dyn Fn() -> anyhow::Result<()>>;

/// Leaf of a command tree: declared flags plus the handler they feed.
pub struct Command {
    description: String,
    flags: Vec<NamedFlag>,
    anon_flags: Vec<AnonFlag>,
    help: Rc<BooleanFlag>,
    handler: Handler,
}

impl Command {
    pub(crate) fn new(
        description: String,
        mut flags: Vec<NamedFlag>,
        anon_flags: Vec<AnonFlag>,
        handler: Handler,
    ) -> Self {
        // Required flags first, declaration order otherwise; help goes last.
        flags.sort_by_key(|flag| !flag.is_required());
        let help = BooleanFlag::new(HELP_FLAG.to_string(), Some("Show this help".to_string()));
        flags.push(NamedFlag::Boolean(help.clone()));
        Self {
            description,
            flags,
            anon_flags,
            help,
            handler,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn execute(&self, out: &mut dyn Write, args: &[String]) -> io::Result<i32> {
        self.reset();
        let parsed = parse_args(&self.flags, &self.anon_flags, args);

        if self.help.value() {
            self.print_help(out)?;
            return Ok(0);
        }
        if let Err(err) = parsed {
            tracing::debug!(%err, "parse failed");
            writeln!(out, "{err}")?;
            self.print_help(out)?;
            return Ok(1);
        }

        tracing::debug!(command = %self.description, "invoking handler");
        let result = {
            let _flush = FlushOnUnwind::new(&mut *out);
            (self.handler)()
        };
        match result {
            Ok(()) => Ok(0),
            Err(err) => {
                writeln!(out, "{err}")?;
                for cause in err.chain().skip(1) {
                    writeln!(out, "  caused by: {cause}")?;
                }
                Ok(1)
            }
        }
    }

    pub(crate) fn print_help(&self, out: &mut dyn Write) -> io::Result<()> {
        let docs: Vec<FlagDoc> = self
            .anon_flags
            .iter()
            .map(AnonFlag::make_doc)
            .chain(self.flags.iter().map(NamedFlag::make_doc))
            .collect();
        writeln!(out, "{}", self.description)?;
        writeln!(out)?;
        writeln!(out, "Accepted flags:")?;
        out.write_all(render_docs(&docs).as_bytes())
    }

    fn reset(&self) {
        for flag in &self.flags {
            flag.reset();
        }
        for anon in &self.anon_flags {
            anon.reset();
        }
    }
}
