use std::error::Error;
use std::fmt;

/// Errors raised while building a [`Population`].
///
/// [`Population`]: crate::Population
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopulationError {
    /// A configuration field was out of range.
    /// Holds the name of the offending field.
    InvalidConfig(&'static str),
}

impl fmt::Display for PopulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(field) => {
                write!(f, "invalid population configuration: {} out of range", field)
            }
        }
    }
}

impl Error for PopulationError {}
