use std::{backtrace::Backtrace, fmt::Debug};

use crate::engine::EngineError;

pub type Result<T, E = ProverError> = core::result::Result<T, E>;

/// Coarse classification of a [`ProverError`], used by callers that need to tell
/// contract violations apart from engine failures and cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Lifecycle,
    Unsupported,
    Solver,
    Interrupted,
    Internal,
    Config,
}

#[derive(thiserror::Error, Debug)]
pub enum InnerError {
    // lifecycle violations
    #[error("prover session is closed")]
    Closed,
    #[error("prover session was already closed")]
    AlreadyClosed,
    #[error("cannot pop below the initial scope depth")]
    ScopeUnderflow,
    #[error("empty named-term table required for an unsat core over assumptions, found {0} entries")]
    NamedTermsNotEmpty(usize),
    #[error("unsat core generation was not enabled for this prover")]
    UnsatCoresDisabled,

    #[error("{0} is not supported")]
    Unsupported(String),

    // internal consistency
    #[error("engine reported core name {0:?} with no matching named term")]
    UnresolvedCoreName(String),

    // configuration
    #[error("unknown prover option {0:?}")]
    UnknownOption(String),
}

#[derive(thiserror::Error)]
pub enum ProverError {
    #[error("Inner: {inner}\n{backtrace}")]
    Inner {
        inner: Box<InnerError>,
        backtrace: Box<Backtrace>,
    },
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("invalid prover configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl Debug for ProverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

macro_rules! new {
    ($inner:expr) => {
        ProverError::Inner {
            inner: Box::new($inner),
            backtrace: Box::new(Backtrace::capture()),
        }
    };
}
use InnerError::*;
impl ProverError {
    pub(crate) fn closed() -> Self {
        new!(Closed)
    }
    pub(crate) fn already_closed() -> Self {
        new!(AlreadyClosed)
    }
    pub(crate) fn scope_underflow() -> Self {
        new!(ScopeUnderflow)
    }
    pub(crate) fn named_terms_not_empty(len: usize) -> Self {
        new!(NamedTermsNotEmpty(len))
    }
    pub(crate) fn unsat_cores_disabled() -> Self {
        new!(UnsatCoresDisabled)
    }
    pub(crate) fn unsupported(what: impl Into<String>) -> Self {
        new!(Unsupported(what.into()))
    }
    pub(crate) fn unresolved_core_name(name: String) -> Self {
        new!(UnresolvedCoreName(name))
    }
    pub(crate) fn unknown_option(name: String) -> Self {
        new!(UnknownOption(name))
    }

    /// Returns the wrapped contract error, if this is not an engine or config error.
    pub fn inner(&self) -> Option<&InnerError> {
        match self {
            ProverError::Inner { inner, .. } => Some(inner),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ProverError::Inner { inner, .. } => match **inner {
                Closed | AlreadyClosed | ScopeUnderflow | NamedTermsNotEmpty(_)
                | UnsatCoresDisabled => ErrorKind::Lifecycle,
                Unsupported(_) => ErrorKind::Unsupported,
                UnresolvedCoreName(_) => ErrorKind::Internal,
                UnknownOption(_) => ErrorKind::Config,
            },
            ProverError::Engine(EngineError::Interrupted) => ErrorKind::Interrupted,
            ProverError::Engine(_) => ErrorKind::Solver,
            ProverError::Config(_) => ErrorKind::Config,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        self.kind() == ErrorKind::Interrupted
    }
}
