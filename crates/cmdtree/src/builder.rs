//! Declaring leaf commands.
//!
//! Each declaration method registers a flag and returns a typed handle. The
//! handler closure captures the handles it needs and reads them once the
//! tokens have been parsed:
//!
//! ```
//! use cmdtree::{CommandBuilder, FlagInfo, LogOutput};
//! use cmdtree::flags::StringFlag;
//!
//! let mut builder = CommandBuilder::new("Print a greeting");
//! let loud = builder.no_arg("--loud", FlagInfo::new().doc("Shout"));
//! let name = builder.required_anon(StringFlag, FlagInfo::new().value_name("name"));
//! let cmd = builder
//!     .run(move || {
//!         let greeting = format!("hello {}", name.value());
//!         if loud.value() {
//!             println!("{}", greeting.to_uppercase());
//!         } else {
//!             println!("{greeting}");
//!         }
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! assert_eq!(cmd.execute(LogOutput::StdErr, &["world".to_string()]), 0);
//! ```

use std::collections::HashSet;
use std::rc::Rc;

use crate::cmd::Cmd;
use crate::command::Command;
use crate::error::BuildError;
use crate::flag::{AnonFlag, BooleanFlag, Cardinality, NamedFlag, Slot, ValueFlag};
use crate::flags::FlagSpec;
use crate::{ESCAPE_MARKER, FLAG_MARKER, HELP_FLAG};

/// Optional descriptive settings shared by every kind of flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagInfo {
    doc: Option<String>,
    value_name: Option<String>,
}

impl FlagInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Help text shown next to the flag.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Placeholder for the flag's value, shown as `<value_name>`.
    pub fn value_name(mut self, value_name: impl Into<String>) -> Self {
        self.value_name = Some(value_name.into());
        self
    }
}

/// Presence of a boolean flag.
#[derive(Clone)]
pub struct BoolFlag(Rc<BooleanFlag>);

impl BoolFlag {
    pub fn value(&self) -> bool {
        self.0.value()
    }
}

/// Value flag that may be absent.
pub struct OptionalFlag<S: FlagSpec>(Rc<Slot<S>>);

impl<S: FlagSpec> OptionalFlag<S> {
    pub fn value(&self) -> Option<S::Value> {
        self.0.value()
    }
}

/// Value flag that falls back to a default when absent.
pub struct DefaultFlag<S: FlagSpec>(Rc<Slot<S>>);

impl<S: FlagSpec> DefaultFlag<S> {
    pub fn value(&self) -> S::Value {
        self.0
            .value()
            .expect("a defaulted flag always resolves to a value")
    }
}

/// Value flag that must be given.
pub struct RequiredFlag<S: FlagSpec>(Rc<Slot<S>>);

impl<S: FlagSpec> RequiredFlag<S> {
    /// # Panics
    ///
    /// If read before a successful parse. Handlers only run after one.
    pub fn value(&self) -> S::Value {
        self.0
            .value()
            .expect("required flag read before parsing succeeded")
    }
}

/// Positional flag taking zero or one value.
pub struct OptionalAnon<S: FlagSpec>(Rc<Slot<S>>);

impl<S: FlagSpec> OptionalAnon<S> {
    pub fn value(&self) -> Option<S::Value> {
        self.0.value()
    }
}

/// Positional flag taking exactly one value.
pub struct RequiredAnon<S: FlagSpec>(Rc<Slot<S>>);

impl<S: FlagSpec> RequiredAnon<S> {
    /// # Panics
    ///
    /// If read before a successful parse. Handlers only run after one.
    pub fn value(&self) -> S::Value {
        self.0
            .value()
            .expect("required anon flag read before parsing succeeded")
    }
}

/// Positional flag collecting every remaining positional token.
pub struct RepeatedAnon<S: FlagSpec>(Rc<Slot<S>>);

impl<S: FlagSpec> RepeatedAnon<S> {
    pub fn values(&self) -> Vec<S::Value> {
        self.0.values()
    }
}

// Handles share one slot; derive(Clone) would demand `S: Clone`.
macro_rules! impl_handle_clone {
    ($($handle:ident),*) => {
        $(impl<S: FlagSpec> Clone for $handle<S> {
            fn clone(&self) -> Self {
                Self(Rc::clone(&self.0))
            }
        })*
    };
}

impl_handle_clone!(
    OptionalFlag,
    DefaultFlag,
    RequiredFlag,
    OptionalAnon,
    RequiredAnon,
    RepeatedAnon
);

/// Collects flag declarations for one leaf command.
pub struct CommandBuilder {
    description: String,
    flags: Vec<NamedFlag>,
    anon_flags: Vec<AnonFlag>,
}

impl CommandBuilder {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            flags: Vec::new(),
            anon_flags: Vec::new(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Boolean flag: `true` if it occurs at least once.
    pub fn no_arg(&mut self, name: impl Into<String>, info: FlagInfo) -> BoolFlag {
        let flag = BooleanFlag::new(name.into(), info.doc);
        self.flags.push(NamedFlag::Boolean(flag.clone()));
        BoolFlag(flag)
    }

    pub fn optional<S: FlagSpec>(
        &mut self,
        name: impl Into<String>,
        spec: S,
        info: FlagInfo,
    ) -> OptionalFlag<S> {
        OptionalFlag(self.value_flag(name.into(), spec, None, false, info))
    }

    pub fn optional_with_default<S: FlagSpec>(
        &mut self,
        name: impl Into<String>,
        spec: S,
        default: S::Value,
        info: FlagInfo,
    ) -> DefaultFlag<S> {
        DefaultFlag(self.value_flag(name.into(), spec, Some(default), false, info))
    }

    pub fn required<S: FlagSpec>(
        &mut self,
        name: impl Into<String>,
        spec: S,
        info: FlagInfo,
    ) -> RequiredFlag<S> {
        RequiredFlag(self.value_flag(name.into(), spec, None, true, info))
    }

    pub fn anon<S: FlagSpec>(&mut self, spec: S, info: FlagInfo) -> OptionalAnon<S> {
        OptionalAnon(self.anon_flag(spec, Cardinality::Optional, info))
    }

    pub fn required_anon<S: FlagSpec>(&mut self, spec: S, info: FlagInfo) -> RequiredAnon<S> {
        RequiredAnon(self.anon_flag(spec, Cardinality::Required, info))
    }

    /// Must be the last anon flag declared; [`CommandBuilder::run`] rejects
    /// anything else.
    pub fn repeated_anon<S: FlagSpec>(&mut self, spec: S, info: FlagInfo) -> RepeatedAnon<S> {
        RepeatedAnon(self.anon_flag(spec, Cardinality::Repeated, info))
    }

    /// Freeze the declarations into a command that runs `handler`.
    pub fn run<F>(self, handler: F) -> Result<Cmd, BuildError>
    where
        F: Fn() -> anyhow::Result<()> + 'static,
    {
        self.validate()?;
        let command = Command::new(
            self.description,
            self.flags,
            self.anon_flags,
            Box::new(handler),
        );
        Ok(Cmd::Leaf(Rc::new(command)))
    }

    fn value_flag<S: FlagSpec>(
        &mut self,
        name: String,
        spec: S,
        default: Option<S::Value>,
        required: bool,
        info: FlagInfo,
    ) -> Rc<Slot<S>> {
        let slot = Slot::new(spec, default);
        self.flags.push(NamedFlag::Value(ValueFlag::new(
            name,
            info.doc,
            info.value_name,
            required,
            slot.clone(),
        )));
        slot
    }

    fn anon_flag<S: FlagSpec>(
        &mut self,
        spec: S,
        cardinality: Cardinality,
        info: FlagInfo,
    ) -> Rc<Slot<S>> {
        let slot = Slot::new(spec, None);
        self.anon_flags.push(AnonFlag::new(
            info.value_name,
            info.doc,
            cardinality,
            slot.clone(),
        ));
        slot
    }

    fn validate(&self) -> Result<(), BuildError> {
        let mut seen: HashSet<&str> = HashSet::from([HELP_FLAG]);
        for flag in &self.flags {
            let name = flag.name();
            if !name.starts_with(FLAG_MARKER) || name == ESCAPE_MARKER {
                return Err(BuildError::InvalidFlagName(name.to_string()));
            }
            if !seen.insert(name) {
                return Err(BuildError::DuplicateFlag(name.to_string()));
            }
        }

        let last = self.anon_flags.len().saturating_sub(1);
        for (idx, anon) in self.anon_flags.iter().enumerate() {
            if anon.cardinality() == Cardinality::Repeated && idx != last {
                return Err(BuildError::RepeatedAnonNotLast(anon.placeholder()));
            }
        }
        Ok(())
    }
}
