use thiserror::Error;

/// Recoverable failures found while matching tokens against declared flags.
///
/// A parse error never reaches the handler: the command prints it followed by
/// its help text and exits with status 1.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown flag '{0}'")]
    UnknownFlag(String),

    #[error("No arguments for flag {0}")]
    MissingFlagArgument(String),

    #[error("Failed to parse flag {flag} with value '{value}': {reason}")]
    FlagValueParseFailure {
        flag: String,
        value: String,
        reason: String,
    },

    #[error("Failed to parse anon flag {placeholder} with value '{value}': {reason}")]
    AnonValueParseFailure {
        placeholder: String,
        value: String,
        reason: String,
    },

    #[error("Unexpected anonymous argument '{0}'")]
    UnexpectedPositional(String),

    #[error("Anon flag {0} was already set")]
    FlagAlreadySet(String),

    #[error("Flag {0} is required, but not provided")]
    MissingRequiredFlag(String),

    #[error("Anon flag {0} is required, but not provided")]
    MissingRequiredAnon(String),
}

/// Caller mistakes detected when a command or group is frozen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("invalid flag name '{0}': flag names must start with '-' and cannot be '--'")]
    InvalidFlagName(String),

    #[error("flag {0} is declared more than once")]
    DuplicateFlag(String),

    #[error("repeated anon flag {0} must be the last anon flag")]
    RepeatedAnonNotLast(String),

    #[error("command '{0}' is declared more than once")]
    DuplicateCommand(String),

    #[error("command name '{0}' is reserved")]
    ReservedCommand(String),

    #[error("command name cannot be empty")]
    EmptyCommandName,
}
