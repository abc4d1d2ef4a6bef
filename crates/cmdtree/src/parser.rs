use crate::error::ParseError;
use crate::flag::{AnonFlag, Cardinality, NamedFlag};
use crate::{ESCAPE_MARKER, FLAG_MARKER};

fn find_flag<'f>(flags: &'f [NamedFlag], name: &str) -> Result<&'f NamedFlag, ParseError> {
    flags
        .iter()
        .find(|flag| flag.name() == name)
        .ok_or_else(|| ParseError::UnknownFlag(name.to_string()))
}

/// Match `args` against one command's declared flags in a single pass.
///
/// - `--` switches off flag interpretation for every following token and is
///   never itself treated as data.
/// - A token starting with `-` names a flag; a value flag always consumes the
///   next token, whatever it looks like.
/// - Every other token feeds the current anon flag. A repeated anon flag keeps
///   the cursor, so it absorbs all remaining positionals.
///
/// After a failure the scan keeps classifying the remaining tokens, so boolean
/// flags such as `--help` still reflect what was given; the first failure is
/// returned. Cardinality is only validated when every token was accepted.
pub(crate) fn parse_args(
    named_flags: &[NamedFlag],
    anon_flags: &[AnonFlag],
    args: &[String],
) -> Result<(), ParseError> {
    let mut anon_index = 0usize;
    let mut escaped = false;
    let mut parse_error: Option<ParseError> = None;
    let mut tokens = args.iter();

    while let Some(arg) = tokens.next() {
        if !escaped && arg == ESCAPE_MARKER {
            tracing::trace!("escape marker, remaining tokens are positional");
            escaped = true;
            continue;
        }

        let result = if !escaped && arg.starts_with(FLAG_MARKER) {
            match find_flag(named_flags, arg) {
                Ok(NamedFlag::Value(flag)) => {
                    let Some(value) = tokens.next() else {
                        parse_error.get_or_insert(ParseError::MissingFlagArgument(arg.clone()));
                        break;
                    };
                    tracing::trace!(flag = %arg, %value, "value flag");
                    flag.parse_value(value)
                }
                Ok(NamedFlag::Boolean(flag)) => {
                    tracing::trace!(flag = %arg, "boolean flag");
                    flag.set();
                    Ok(())
                }
                Err(err) => Err(err),
            }
        } else if let Some(anon) = anon_flags.get(anon_index) {
            tracing::trace!(index = anon_index, value = %arg, "anon flag");
            if anon.cardinality() != Cardinality::Repeated {
                anon_index += 1;
            }
            anon.parse_value(arg)
        } else {
            Err(ParseError::UnexpectedPositional(arg.clone()))
        };

        if let Err(err) = result {
            parse_error.get_or_insert(err);
        }
    }

    if let Some(err) = parse_error {
        return Err(err);
    }
    for flag in named_flags {
        flag.finish_parsing()?;
    }
    for anon in anon_flags {
        anon.finish_parsing()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::flag::{BooleanFlag, Slot, ValueFlag};
    use crate::flags::{IntFlag, StringFlag};

    struct Fixture {
        named: Vec<NamedFlag>,
        anon: Vec<AnonFlag>,
        boolean: Rc<BooleanFlag>,
        int: Rc<Slot<IntFlag>>,
        first: Rc<Slot<StringFlag>>,
        rest: Rc<Slot<StringFlag>>,
    }

    fn fixture() -> Fixture {
        let boolean = BooleanFlag::new("--bool".to_string(), None);
        let int = Slot::new(IntFlag, None);
        let first = Slot::new(StringFlag, None);
        let rest = Slot::new(StringFlag, None);
        Fixture {
            named: vec![
                NamedFlag::Boolean(boolean.clone()),
                NamedFlag::Value(ValueFlag::new(
                    "--int".to_string(),
                    None,
                    None,
                    false,
                    int.clone(),
                )),
            ],
            anon: vec![
                AnonFlag::new(
                    Some("first".to_string()),
                    None,
                    Cardinality::Optional,
                    first.clone(),
                ),
                AnonFlag::new(
                    Some("rest".to_string()),
                    None,
                    Cardinality::Repeated,
                    rest.clone(),
                ),
            ],
            boolean,
            int,
            first,
            rest,
        }
    }

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    fn parse(f: &Fixture, tokens: &[&str]) -> Result<(), ParseError> {
        parse_args(&f.named, &f.anon, &args(tokens))
    }

    #[test]
    fn repeated_anon_absorbs_remaining_positionals() {
        let f = fixture();
        parse(&f, &["a", "b", "c"]).unwrap();
        assert_eq!(f.first.value().as_deref(), Some("a"));
        assert_eq!(f.rest.values(), vec!["b", "c"]);
    }

    #[test]
    fn flags_and_positionals_interleave() {
        let f = fixture();
        parse(&f, &["a", "--int", "5", "b", "--bool", "c"]).unwrap();
        assert!(f.boolean.value());
        assert_eq!(f.int.value(), Some(5));
        assert_eq!(f.first.value().as_deref(), Some("a"));
        assert_eq!(f.rest.values(), vec!["b", "c"]);
    }

    #[test]
    fn escape_marker_turns_flags_into_positionals() {
        let f = fixture();
        parse(&f, &["--", "--looks-like-a-flag", "--"]).unwrap();
        assert_eq!(f.first.value().as_deref(), Some("--looks-like-a-flag"));
        assert_eq!(f.rest.values(), vec!["--"]);
        assert!(!f.boolean.value());
    }

    #[test]
    fn value_flag_eats_next_token() {
        let f = fixture();
        let err = parse(&f, &["--int", "--bool"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::FlagValueParseFailure {
                flag: "--int".to_string(),
                value: "--bool".to_string(),
                reason: "Not a numerical value".to_string(),
            }
        );
        assert!(!f.boolean.value());
    }

    #[test]
    fn reports_unknown_and_incomplete_flags() {
        let f = fixture();
        assert_eq!(
            parse(&f, &["--nope"]),
            Err(ParseError::UnknownFlag("--nope".to_string()))
        );
        assert_eq!(
            parse(&f, &["-"]),
            Err(ParseError::UnknownFlag("-".to_string()))
        );
        assert_eq!(
            parse(&f, &["--int"]),
            Err(ParseError::MissingFlagArgument("--int".to_string()))
        );
    }

    #[test]
    fn rejects_positional_without_anon_flag() {
        let named = vec![];
        let anon = vec![AnonFlag::new(
            None,
            None,
            Cardinality::Required,
            Slot::new(StringFlag, None),
        )];
        assert_eq!(
            parse_args(&named, &anon, &args(&["a", "b"])),
            Err(ParseError::UnexpectedPositional("b".to_string()))
        );
        anon[0].reset();
        assert_eq!(
            parse_args(&named, &anon, &[]),
            Err(ParseError::MissingRequiredAnon("<VALUE>".to_string()))
        );
    }

    #[test]
    fn boolean_repetition_is_idempotent() {
        let f = fixture();
        parse(&f, &["--bool", "--bool"]).unwrap();
        assert!(f.boolean.value());
    }

    #[test]
    fn boolean_flags_after_an_error_are_still_recorded() {
        let f = fixture();
        assert_eq!(
            parse(&f, &["--nope", "--bool", "x"]),
            Err(ParseError::UnknownFlag("--nope".to_string()))
        );
        assert!(f.boolean.value());
    }

    #[test]
    fn flag_consumed_as_value_is_not_set() {
        let help = BooleanFlag::new("--help".to_string(), None);
        let named = vec![
            NamedFlag::Value(ValueFlag::new(
                "--int".to_string(),
                None,
                None,
                false,
                Slot::new(IntFlag, None),
            )),
            NamedFlag::Boolean(help.clone()),
        ];
        assert!(parse_args(&named, &[], &args(&["--int", "--help"])).is_err());
        assert!(!help.value());
    }
}
