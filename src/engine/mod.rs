//! The narrow interface through which a prover session reaches the underlying
//! satisfiability engine.
//!
//! The engine owns term representation, sorts and the decision procedure. The
//! session layer only pushes and pops scopes, asserts (possibly named) terms,
//! checks satisfiability and reads back models, cores and AllSat enumerations.

use std::fmt;

pub mod error;

pub use error::EngineError;

pub type EngineResult<T, E = EngineError> = core::result::Result<T, E>;

/// The value an engine model assigns to a term.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Bool(bool),
    Int(i64),
    /// Any value the engine can only render textually (reals, bit-vectors, arrays, ...).
    Other(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(v) => write!(f, "{}", v),
            Value::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

/// One entry of a model: the term, its textual name and the value assigned to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueAssignment<T> {
    pub key: T,
    pub name: String,
    pub value: Value,
}

impl<T> ValueAssignment<T> {
    pub fn new(key: T, name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key,
            name: name.into(),
            value: value.into(),
        }
    }
}

impl<T> fmt::Display for ValueAssignment<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

/// A model handle produced by a satisfiable check.
///
/// The handle is released when dropped; engines that hold native resources
/// free them in their `Drop` implementation.
pub trait EngineModel {
    type Term;

    fn assignments(&self) -> EngineResult<Vec<ValueAssignment<Self::Term>>>;
}

/// The operations a prover session requires from a satisfiability engine.
pub trait Engine {
    type Term: Clone + fmt::Debug;
    type Model: EngineModel<Term = Self::Term>;

    /// Opens `n` new assertion scopes.
    fn push(&mut self, n: usize) -> EngineResult<()>;

    /// Discards the `n` innermost assertion scopes.
    fn pop(&mut self, n: usize) -> EngineResult<()>;

    /// Permanently adds `term` to the innermost scope.
    fn assert_term(&mut self, term: &Self::Term) -> EngineResult<()>;

    /// Returns a copy of `term` carrying `name`, so that a later unsat core can
    /// refer back to it.
    fn annotate(&mut self, term: &Self::Term, name: &str) -> EngineResult<Self::Term>;

    /// Returns `true` if the asserted terms are satisfiable.
    fn check_sat(&mut self) -> EngineResult<bool>;

    /// Names of the annotated terms responsible for the last unsatisfiable check.
    fn unsat_core(&mut self) -> EngineResult<Vec<String>>;

    fn model(&mut self) -> EngineResult<Self::Model>;

    /// Enumerates every distinct satisfying assignment over `important`, handing
    /// each one (as the list of literals that hold) to `on_model` before
    /// searching for the next.
    fn all_sat(
        &mut self,
        important: &[Self::Term],
        on_model: &mut dyn FnMut(&[Self::Term]),
    ) -> EngineResult<()>;

    fn stack_depth(&self) -> usize;
}
