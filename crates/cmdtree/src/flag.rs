//! Declared flags and their parse state.
//!
//! Flags come in two closed families. Named flags are either [`BooleanFlag`]
//! (presence only) or [`ValueFlag`] (consumes the following token). Anon
//! flags are bound by position and carry a [`Cardinality`]. Typed values live
//! in a [`Slot`]; the flag structs only see it through [`ValueSlot`] so the
//! parser stays independent of value types.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::ParseError;
use crate::flags::FlagSpec;
use crate::help::FlagDoc;

pub(crate) struct Slot<S: FlagSpec> {
    spec: S,
    default: Option<S::Value>,
    values: RefCell<Vec<S::Value>>,
}

impl<S: FlagSpec> Slot<S> {
    pub(crate) fn new(spec: S, default: Option<S::Value>) -> Rc<Self> {
        Rc::new(Self {
            spec,
            default,
            values: RefCell::new(Vec::new()),
        })
    }

    /// Last parsed value, falling back to the default.
    pub(crate) fn value(&self) -> Option<S::Value> {
        self.values
            .borrow()
            .last()
            .cloned()
            .or_else(|| self.default.clone())
    }

    pub(crate) fn values(&self) -> Vec<S::Value> {
        self.values.borrow().clone()
    }
}

pub(crate) trait ValueSlot {
    /// Parse `token` and append it.
    fn push(&self, token: &str) -> anyhow::Result<()>;

    /// Parse `token` and make it the only stored value.
    fn replace(&self, token: &str) -> anyhow::Result<()>;

    fn len(&self) -> usize;

    fn clear(&self);

    fn default_str(&self) -> Option<String>;
}

impl<S: FlagSpec> ValueSlot for Slot<S> {
    fn push(&self, token: &str) -> anyhow::Result<()> {
        let value = self.spec.of_string(token)?;
        self.values.borrow_mut().push(value);
        Ok(())
    }

    fn replace(&self, token: &str) -> anyhow::Result<()> {
        let value = self.spec.of_string(token)?;
        let mut values = self.values.borrow_mut();
        values.clear();
        values.push(value);
        Ok(())
    }

    fn len(&self) -> usize {
        self.values.borrow().len()
    }

    fn clear(&self) {
        self.values.borrow_mut().clear();
    }

    fn default_str(&self) -> Option<String> {
        self.default.as_ref().map(|v| self.spec.to_string(v))
    }
}

pub(crate) struct BooleanFlag {
    name: String,
    doc: Option<String>,
    present: Cell<bool>,
}

impl BooleanFlag {
    pub(crate) fn new(name: String, doc: Option<String>) -> Rc<Self> {
        Rc::new(Self {
            name,
            doc,
            present: Cell::new(false),
        })
    }

    /// Setting an already present flag is a no-op.
    pub(crate) fn set(&self) {
        self.present.set(true);
    }

    pub(crate) fn value(&self) -> bool {
        self.present.get()
    }

    fn make_doc(&self) -> FlagDoc {
        FlagDoc::new(format!("[{}]", self.name), self.doc.clone())
    }
}

pub(crate) struct ValueFlag {
    name: String,
    doc: Option<String>,
    value_name: Option<String>,
    required: bool,
    slot: Rc<dyn ValueSlot>,
}

impl ValueFlag {
    pub(crate) fn new(
        name: String,
        doc: Option<String>,
        value_name: Option<String>,
        required: bool,
        slot: Rc<dyn ValueSlot>,
    ) -> Self {
        Self {
            name,
            doc,
            value_name,
            required,
            slot,
        }
    }

    /// Last occurrence wins.
    pub(crate) fn parse_value(&self, token: &str) -> Result<(), ParseError> {
        self.slot
            .replace(token)
            .map_err(|err| ParseError::FlagValueParseFailure {
                flag: self.name.clone(),
                value: token.to_string(),
                reason: format!("{err:#}"),
            })
    }

    pub(crate) fn finish_parsing(&self) -> Result<(), ParseError> {
        if self.required && self.slot.len() == 0 {
            return Err(ParseError::MissingRequiredFlag(self.name.clone()));
        }
        Ok(())
    }

    fn make_doc(&self) -> FlagDoc {
        let value_name = self.value_name.as_deref().unwrap_or("VALUE");
        let mut left = format!("{} <{value_name}>", self.name);
        if !self.required {
            left = format!("[{left}]");
        }

        let mut right = self.doc.clone().unwrap_or_default();
        if let Some(default) = self.slot.default_str() {
            if !right.is_empty() {
                right.push(' ');
            }
            right.push_str(&format!("[default = {default}]"));
        }
        FlagDoc::new(left, Some(right))
    }
}

pub(crate) enum NamedFlag {
    Boolean(Rc<BooleanFlag>),
    Value(ValueFlag),
}

impl NamedFlag {
    pub(crate) fn name(&self) -> &str {
        match self {
            Self::Boolean(flag) => &flag.name,
            Self::Value(flag) => &flag.name,
        }
    }

    pub(crate) fn is_required(&self) -> bool {
        match self {
            Self::Boolean(_) => false,
            Self::Value(flag) => flag.required,
        }
    }

    pub(crate) fn finish_parsing(&self) -> Result<(), ParseError> {
        match self {
            Self::Boolean(_) => Ok(()),
            Self::Value(flag) => flag.finish_parsing(),
        }
    }

    pub(crate) fn reset(&self) {
        match self {
            Self::Boolean(flag) => flag.present.set(false),
            Self::Value(flag) => flag.slot.clear(),
        }
    }

    pub(crate) fn make_doc(&self) -> FlagDoc {
        match self {
            Self::Boolean(flag) => flag.make_doc(),
            Self::Value(flag) => flag.make_doc(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cardinality {
    Optional,
    Required,
    Repeated,
}

pub(crate) struct AnonFlag {
    value_name: Option<String>,
    doc: Option<String>,
    cardinality: Cardinality,
    slot: Rc<dyn ValueSlot>,
}

impl AnonFlag {
    pub(crate) fn new(
        value_name: Option<String>,
        doc: Option<String>,
        cardinality: Cardinality,
        slot: Rc<dyn ValueSlot>,
    ) -> Self {
        Self {
            value_name,
            doc,
            cardinality,
            slot,
        }
    }

    pub(crate) fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// `<name>`, used in error messages and as the core of the help entry.
    pub(crate) fn placeholder(&self) -> String {
        format!("<{}>", self.value_name.as_deref().unwrap_or("VALUE"))
    }

    pub(crate) fn parse_value(&self, token: &str) -> Result<(), ParseError> {
        if self.cardinality != Cardinality::Repeated && self.slot.len() > 0 {
            return Err(ParseError::FlagAlreadySet(self.placeholder()));
        }
        self.slot
            .push(token)
            .map_err(|err| ParseError::AnonValueParseFailure {
                placeholder: self.placeholder(),
                value: token.to_string(),
                reason: format!("{err:#}"),
            })
    }

    pub(crate) fn finish_parsing(&self) -> Result<(), ParseError> {
        if self.cardinality == Cardinality::Required && self.slot.len() == 0 {
            return Err(ParseError::MissingRequiredAnon(self.placeholder()));
        }
        Ok(())
    }

    pub(crate) fn reset(&self) {
        self.slot.clear();
    }

    pub(crate) fn make_doc(&self) -> FlagDoc {
        let placeholder = self.placeholder();
        let left = match self.cardinality {
            Cardinality::Required => placeholder,
            Cardinality::Optional => format!("[{placeholder}]"),
            Cardinality::Repeated => format!("[{placeholder} ...]"),
        };
        FlagDoc::new(left, self.doc.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{IntFlag, StringFlag};

    fn anon(cardinality: Cardinality) -> (Rc<Slot<StringFlag>>, AnonFlag) {
        let slot = Slot::new(StringFlag, None);
        let flag = AnonFlag::new(Some("file".to_string()), None, cardinality, slot.clone());
        (slot, flag)
    }

    #[test]
    fn boolean_set_is_idempotent() {
        let flag = BooleanFlag::new("--bool".to_string(), None);
        assert!(!flag.value());
        flag.set();
        flag.set();
        assert!(flag.value());
    }

    #[test]
    fn value_flag_last_occurrence_wins() {
        let slot = Slot::new(IntFlag, None);
        let flag = ValueFlag::new("--int".to_string(), None, None, false, slot.clone());
        flag.parse_value("1").unwrap();
        flag.parse_value("2").unwrap();
        assert_eq!(slot.value(), Some(2));
    }

    #[test]
    fn value_flag_reports_flag_and_token() {
        let slot = Slot::new(IntFlag, None);
        let flag = ValueFlag::new("--int".to_string(), None, None, false, slot);
        let err = flag.parse_value("abc").unwrap_err();
        assert_eq!(
            err,
            ParseError::FlagValueParseFailure {
                flag: "--int".to_string(),
                value: "abc".to_string(),
                reason: "Not a numerical value".to_string(),
            }
        );
    }

    #[test]
    fn default_does_not_count_as_parsed() {
        let slot = Slot::new(StringFlag, Some("foobar".to_string()));
        let flag = ValueFlag::new("--flag".to_string(), None, None, false, slot.clone());
        flag.finish_parsing().unwrap();
        assert_eq!(slot.value().as_deref(), Some("foobar"));

        let required = Slot::new(StringFlag, None);
        let flag = ValueFlag::new("--filename".to_string(), None, None, true, required);
        assert_eq!(
            flag.finish_parsing(),
            Err(ParseError::MissingRequiredFlag("--filename".to_string()))
        );
    }

    #[test]
    fn single_anon_rejects_second_value() {
        let (_, flag) = anon(Cardinality::Optional);
        flag.parse_value("a").unwrap();
        assert_eq!(
            flag.parse_value("b"),
            Err(ParseError::FlagAlreadySet("<file>".to_string()))
        );
    }

    #[test]
    fn repeated_anon_appends() {
        let (slot, flag) = anon(Cardinality::Repeated);
        for token in ["a", "b", "c"] {
            flag.parse_value(token).unwrap();
        }
        assert_eq!(slot.values(), vec!["a", "b", "c"]);
        flag.finish_parsing().unwrap();
        flag.reset();
        assert!(slot.values().is_empty());
    }

    #[test]
    fn required_anon_must_be_present() {
        let (_, flag) = anon(Cardinality::Required);
        assert_eq!(
            flag.finish_parsing(),
            Err(ParseError::MissingRequiredAnon("<file>".to_string()))
        );
    }

    #[test]
    fn docs_follow_cardinality() {
        let left = |c| anon(c).1.make_doc().left;
        assert_eq!(left(Cardinality::Required), "<file>");
        assert_eq!(left(Cardinality::Optional), "[<file>]");
        assert_eq!(left(Cardinality::Repeated), "[<file> ...]");

        let slot = Slot::new(IntFlag, Some(3));
        let flag = NamedFlag::Value(ValueFlag::new(
            "--times".to_string(),
            Some("How often".to_string()),
            Some("N".to_string()),
            false,
            slot,
        ));
        let doc = flag.make_doc();
        assert_eq!(doc.left, "[--times <N>]");
        assert_eq!(doc.right.as_deref(), Some("How often [default = 3]"));

        let flag = NamedFlag::Boolean(BooleanFlag::new("--bool".to_string(), None));
        assert_eq!(flag.make_doc().left, "[--bool]");
    }
}
