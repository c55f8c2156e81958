//! Non-fatal compilation findings

use std::fmt;

/// Something the compiler absorbed instead of failing on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// No environment with this name is declared in settings
    UnknownEnvironment { name: String },
    /// Priority text could not be parsed, zero was used
    InvalidPriority { environment: String, value: String },
    /// The selector matched no stage, the job has no task groups
    EmptySelection { selector: String },
    /// Driver label is neither `docker` nor `raw_exec`
    UnknownDriver { step: String, driver: String },
    /// Interface has no non-loopback IPv4 address, the endpoint has an empty host
    MissingInterfaceAddress { interface: String },
    /// Packaging the working directory failed
    PackagingFailed { target: String, reason: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownEnvironment { name } => {
                write!(f, "environment '{}' is not declared in settings", name)
            }
            Diagnostic::InvalidPriority { environment, value } => write!(
                f,
                "environment '{}' has invalid priority '{}', using 0",
                environment, value
            ),
            Diagnostic::EmptySelection { selector } => {
                write!(f, "selector '{}' matched no stage", selector)
            }
            Diagnostic::UnknownDriver { step, driver } => write!(
                f,
                "step '{}' uses unknown driver '{}', task config left empty",
                step, driver
            ),
            Diagnostic::MissingInterfaceAddress { interface } => write!(
                f,
                "no non-loopback IPv4 address on interface '{}'",
                interface
            ),
            Diagnostic::PackagingFailed { target, reason } => {
                write!(f, "failed to package artifact into {}: {}", target, reason)
            }
        }
    }
}

/// Ordered collection of diagnostics for one compilation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    #[cfg(test)]
    pub fn contains(&self, diagnostic: &Diagnostic) -> bool {
        self.0.contains(diagnostic)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
