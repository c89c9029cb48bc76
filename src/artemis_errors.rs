use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtemisError {
    #[error("No past/future {0} found inside the search window")]
    NoEventInRange(&'static str),

    #[error("Date does not exist in the target calendar year: {0}")]
    NonexistentDate(String),

    #[error("Instant is outside the representable range: {0}")]
    InstantOutOfRange(String),

    #[error("Request is not valid UTF-8 text")]
    InvalidRequest,

    #[error("Unable to perform socket operation: {0}")]
    Io(#[from] std::io::Error),

    #[error("Deadline elapsed while {0}")]
    Timeout(&'static str),

    #[error("Query task failed: {0}")]
    TaskFailed(String),

    #[error("Unable to read configuration file {0}: {1}")]
    ConfigRead(String, std::io::Error),

    #[error("Invalid TOML configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration value: {0}")]
    InvalidConfig(String),

    #[error("Unable to bind {0}: {1}")]
    Bind(String, std::io::Error),
}

impl ArtemisError {
    /// Whether this error comes from the value being asked about rather than from the
    /// machinery answering it.
    ///
    /// These are reported to the client as `BadValue`; every other error closes the
    /// connection without a reply.
    pub fn is_value_error(&self) -> bool {
        matches!(
            self,
            ArtemisError::NoEventInRange(_)
                | ArtemisError::NonexistentDate(_)
                | ArtemisError::InstantOutOfRange(_)
        )
    }
}

impl PartialEq for ArtemisError {
    fn eq(&self, other: &Self) -> bool {
        use ArtemisError::*;
        match (self, other) {
            (NoEventInRange(a), NoEventInRange(b)) => a == b,
            (NonexistentDate(a), NonexistentDate(b)) => a == b,
            (InstantOutOfRange(a), InstantOutOfRange(b)) => a == b,
            (Timeout(a), Timeout(b)) => a == b,
            (TaskFailed(a), TaskFailed(b)) => a == b,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,

            // io and toml errors are not comparable: same variant is enough
            (Io(_), Io(_)) => true,
            (ConfigRead(a, _), ConfigRead(b, _)) => a == b,
            (ConfigParse(_), ConfigParse(_)) => true,
            (Bind(a, _), Bind(b, _)) => a == b,

            (InvalidRequest, InvalidRequest) => true,

            _ => false,
        }
    }
}
