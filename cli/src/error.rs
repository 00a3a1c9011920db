use thiserror::Error;

/// Failures surfaced to the user as a single descriptive line.
///
/// Every variant terminates the invocation where it is raised; nothing is
/// recovered locally and no partial request is ever sent to Defender.
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown or missing top-level command.
    #[error("{0}")]
    Usage(String),

    /// Missing, empty or unrecognized options, or wrong positional arity.
    #[error("{0}")]
    Validation(String),

    /// Artifact file unreadable, not JSON, or missing the requested field.
    #[error("{0}")]
    Artifact(String),

    /// Chain id not present in the known network table.
    #[error("Network {0} is not supported by OpenZeppelin Defender")]
    NetworkResolution(u64),

    /// Credentials missing from the environment.
    #[error("{0}")]
    Configuration(String),

    /// The Defender API call itself failed; propagated verbatim.
    #[error("{0}")]
    Remote(String),
}
