//! Domain classification tags.
//!
//! Every question carries exactly one [`Domain`], determined before
//! participant selection. The tag controls which entries of a participant's
//! weight table apply. The set is closed: an unrecognized tag fails with
//! [`DomainError::UnknownDomain`] at the parse boundary, before any
//! dispatch is attempted.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a question, driving weight multipliers.
///
/// # Example
///
/// ```
/// use conclave_domain::roster::Domain;
///
/// let domain: Domain = "auth".parse().unwrap();
/// assert_eq!(domain, Domain::Auth);
/// assert!("networking".parse::<Domain>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    /// Security-sensitive questions (vulnerabilities, hardening)
    Security,
    /// Authentication and authorization
    Auth,
    /// Data handling, privacy, retention
    DataHandling,
    /// Algorithmic correctness and complexity
    Algorithmic,
    /// Everything else
    #[default]
    General,
}

impl Domain {
    /// All recognized domain tags.
    pub const ALL: [Domain; 5] = [
        Domain::Security,
        Domain::Auth,
        Domain::DataHandling,
        Domain::Algorithmic,
        Domain::General,
    ];

    /// Short label used in config keys and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Security => "security",
            Domain::Auth => "auth",
            Domain::DataHandling => "data-handling",
            Domain::Algorithmic => "algorithmic",
            Domain::General => "general",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Domain {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "security" => Ok(Domain::Security),
            "auth" => Ok(Domain::Auth),
            "data-handling" | "data_handling" => Ok(Domain::DataHandling),
            "algorithmic" => Ok(Domain::Algorithmic),
            "general" => Ok(Domain::General),
            other => Err(DomainError::UnknownDomain(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_default() {
        assert_eq!(Domain::default(), Domain::General);
    }

    #[test]
    fn test_domain_display_roundtrip() {
        for domain in Domain::ALL {
            let parsed: Domain = domain.as_str().parse().unwrap();
            assert_eq!(parsed, domain);
        }
    }

    #[test]
    fn test_domain_from_str_case_insensitive() {
        assert_eq!("AUTH".parse::<Domain>().ok(), Some(Domain::Auth));
        assert_eq!(
            "data_handling".parse::<Domain>().ok(),
            Some(Domain::DataHandling)
        );
    }

    #[test]
    fn test_unknown_domain_fails() {
        let err = "networking".parse::<Domain>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownDomain(ref s) if s == "networking"));
    }
}
