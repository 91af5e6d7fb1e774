//! Incremental prover sessions on top of a satisfiability engine.
//!
//! A [`Session`] keeps a stack of assertion scopes in lockstep with the
//! engine. A [`TheoremProver`] builds on it to answer unsat-core queries,
//! emulating solving under assumptions with named assertions in a temporary
//! scope, and relays AllSat enumerations to a caller-supplied callback.

pub mod engine;
mod error;
pub use error::{ErrorKind, InnerError, ProverError, Result};
pub mod options;
pub mod prover;

pub use engine::{Engine, EngineError, EngineModel, Value, ValueAssignment};
pub use options::{ProverOption, ProverOptions};
pub use prover::{
    AllSatCallback, BasicProver, CollectModels, CountModels, ProverEnvironment, ScopedModel,
    Session, TheoremProver,
};
