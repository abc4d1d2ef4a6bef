//! Declarative flag parsing and sub-command dispatch.
//!
//! Applications declare named flags, positional ("anon") flags and nested
//! sub-commands; `cmdtree` parses raw arguments into typed values, validates
//! required/optional/repeated constraints, renders aligned help text and
//! routes control to a handler.
//!
//! # Example
//!
//! ```rust,no_run
//! use cmdtree::{CommandBuilder, FlagInfo, GroupBuilder};
//! use cmdtree::flags::{IntFlag, StringFlag};
//!
//! let mut builder = CommandBuilder::new("Say hello");
//! let name = builder.required("--name", StringFlag, FlagInfo::new().value_name("NAME"));
//! let times = builder.optional_with_default("--times", IntFlag, 1, FlagInfo::new());
//! let hello = builder
//!     .run(move || {
//!         for _ in 0..times.value() {
//!             println!("hello {}", name.value());
//!         }
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let app = GroupBuilder::new("Demo").cmd("hello", hello).build().unwrap();
//! std::process::exit(app.main());
//! ```

mod builder;
mod cmd;
mod command;
mod error;
mod flag;
pub mod flags;
mod group;
mod help;
mod output;
mod parser;

pub use builder::{
    BoolFlag, CommandBuilder, DefaultFlag, FlagInfo, OptionalAnon, OptionalFlag, RepeatedAnon,
    RequiredAnon, RequiredFlag,
};
pub use cmd::Cmd;
pub use command::{Command, Handler};
pub use error::{BuildError, ParseError};
pub use flags::FlagSpec;
pub use group::{CommandGroup, GroupBuilder};
pub use help::{FlagDoc, render_docs};
pub use output::LogOutput;

/// Token that disables flag interpretation for every following token.
pub const ESCAPE_MARKER: &str = "--";

/// First character of every named flag.
pub const FLAG_MARKER: char = '-';

/// Name of the flag injected into every leaf command.
pub const HELP_FLAG: &str = "--help";

/// Name of the pseudo-command injected into every group.
pub const HELP_COMMAND: &str = "help";
