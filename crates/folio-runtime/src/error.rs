#![forbid(unsafe_code)]

//! Mount errors.
//!
//! Every failure here is expected absence of optional markup. The page logs
//! the error and runs without the affected component.

use std::fmt;

/// Why a component could not be mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    /// A required element (or set of elements) was not found.
    MissingMarkup {
        component: &'static str,
        selector: String,
    },
}

impl MountError {
    pub(crate) fn missing(component: &'static str, selector: impl Into<String>) -> Self {
        Self::MissingMarkup {
            component,
            selector: selector.into(),
        }
    }

    /// Name of the component that failed to mount.
    #[must_use]
    pub fn component(&self) -> &'static str {
        match self {
            Self::MissingMarkup { component, .. } => component,
        }
    }
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMarkup {
                component,
                selector,
            } => write!(f, "{component}: required markup not found ({selector})"),
        }
    }
}

impl std::error::Error for MountError {}
