//! Value conversion for flags.
//!
//! A [`FlagSpec`] knows how to turn a raw token into a typed value and how to
//! print a value back (used to show defaults in help text). The parser never
//! looks at value types directly, so any type can become a flag value by
//! implementing this trait or by going through [`Parsed`].

use std::fmt::Display;
use std::marker::PhantomData;
use std::num::IntErrorKind;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Result, anyhow};

/// Conversion contract between tokens and flag values.
///
/// `of_string(&to_string(v))` must yield a value equal to `v` for every `v`
/// produced by `of_string`.
pub trait FlagSpec: 'static {
    type Value: Clone + 'static;

    fn of_string(&self, token: &str) -> Result<Self::Value>;

    fn to_string(&self, value: &Self::Value) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StringFlag;

impl FlagSpec for StringFlag {
    type Value = String;

    fn of_string(&self, token: &str) -> Result<String> {
        Ok(token.to_string())
    }

    fn to_string(&self, value: &String) -> String {
        value.clone()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntFlag;

impl FlagSpec for IntFlag {
    type Value = i64;

    fn of_string(&self, token: &str) -> Result<i64> {
        token.parse::<i64>().map_err(|err| match err.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => anyhow!("Numerical overflow"),
            _ => anyhow!("Not a numerical value"),
        })
    }

    fn to_string(&self, value: &i64) -> String {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FloatFlag;

impl FlagSpec for FloatFlag {
    type Value = f64;

    fn of_string(&self, token: &str) -> Result<f64> {
        token
            .parse::<f64>()
            .map_err(|_| anyhow!("Not a numerical value"))
    }

    fn to_string(&self, value: &f64) -> String {
        // `Display` for f64 prints the shortest text that parses back exactly.
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PathFlag;

impl FlagSpec for PathFlag {
    type Value = PathBuf;

    fn of_string(&self, token: &str) -> Result<PathBuf> {
        if token.is_empty() {
            return Err(anyhow!("empty path"));
        }
        Ok(PathBuf::from(token))
    }

    fn to_string(&self, value: &PathBuf) -> String {
        value.display().to_string()
    }
}

/// Spec for any type that can parse and print itself.
///
/// ```
/// use cmdtree::FlagSpec;
/// use cmdtree::flags::Parsed;
/// use std::net::Ipv4Addr;
///
/// let spec = Parsed::<Ipv4Addr>::new();
/// assert_eq!(spec.of_string("127.0.0.1").unwrap(), Ipv4Addr::LOCALHOST);
/// ```
pub struct Parsed<T>(PhantomData<fn() -> T>);

impl<T> Parsed<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Parsed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Parsed<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Parsed<T> {}

impl<T> FlagSpec for Parsed<T>
where
    T: FromStr + Display + Clone + 'static,
    T::Err: Display,
{
    type Value = T;

    fn of_string(&self, token: &str) -> Result<T> {
        token.parse::<T>().map_err(|err| anyhow!("{err}"))
    }

    fn to_string(&self, value: &T) -> String {
        value.to_string()
    }
}
