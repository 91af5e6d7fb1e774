use std::{fmt::Debug, marker::PhantomData, ops::Deref};

use crate::{
    engine::{EngineModel, ValueAssignment},
    error::{ProverError, Result},
};

pub mod naming;
pub mod session;
pub mod theorem;

#[cfg(test)]
pub(crate) mod test_utils;

pub use session::Session;
pub use theorem::TheoremProver;

/// A model borrowed from a prover.
///
/// The model mutably borrows the prover it came from, so no other query can
/// be issued until it is dropped. Dropping it releases the engine's model.
pub struct ScopedModel<'s, M> {
    model: M,
    _prover: PhantomData<&'s mut ()>,
}

impl<M> ScopedModel<'_, M> {
    /// Wraps a model fetched from an engine, for provers implementing
    /// [`BasicProver::get_model`].
    ///
    /// ```
    /// use scoped_prover::{BasicProver, Engine, Result, ScopedModel};
    ///
    /// struct Flat<E: Engine> {
    ///     engine: E,
    /// }
    ///
    /// impl<E: Engine> BasicProver for Flat<E> {
    ///     type Term = E::Term;
    ///     type Model = E::Model;
    ///
    ///     fn push(&mut self) -> Result<()> {
    ///         Ok(self.engine.push(1)?)
    ///     }
    ///
    ///     fn pop(&mut self) -> Result<()> {
    ///         Ok(self.engine.pop(1)?)
    ///     }
    ///
    ///     fn is_unsat(&mut self) -> Result<bool> {
    ///         Ok(!self.engine.check_sat()?)
    ///     }
    ///
    ///     fn get_model(&mut self) -> Result<ScopedModel<'_, E::Model>> {
    ///         Ok(ScopedModel::new(self.engine.model()?))
    ///     }
    ///
    ///     fn close(&mut self) -> Result<()> {
    ///         Ok(())
    ///     }
    /// }
    /// ```
    pub fn new(model: M) -> Self {
        Self {
            model,
            _prover: PhantomData,
        }
    }
}

impl<M> Deref for ScopedModel<'_, M> {
    type Target = M;

    fn deref(&self) -> &M {
        &self.model
    }
}

/// Scope and model handling shared by every prover.
pub trait BasicProver {
    type Term: Clone + Debug;
    type Model: EngineModel<Term = Self::Term>;

    /// Opens a new assertion scope.
    fn push(&mut self) -> Result<()>;

    /// Discards the innermost assertion scope and everything asserted in it.
    fn pop(&mut self) -> Result<()>;

    /// Checks the conjunction of all live assertions.
    ///
    /// Note the polarity: returns `true` when the assertions are
    /// **unsatisfiable** and `false` when they are satisfiable.
    fn is_unsat(&mut self) -> Result<bool>;

    /// Returns the model of the last check. Only meaningful right after
    /// [`BasicProver::is_unsat`] returned `false`; otherwise what the engine
    /// hands back is engine-defined.
    fn get_model(&mut self) -> Result<ScopedModel<'_, Self::Model>>;

    /// Reads every assignment of the current model. The model is released
    /// before returning, whether or not extraction succeeded.
    fn get_model_assignments(&mut self) -> Result<Vec<ValueAssignment<Self::Term>>> {
        let model = self.get_model()?;
        let assignments = model.assignments()?;
        Ok(assignments)
    }

    /// Unwinds every scope and closes the prover. Closing twice is an error.
    fn close(&mut self) -> Result<()>;

    /// Checks satisfiability as if `assumptions` were asserted.
    fn is_unsat_with_assumptions(&mut self, _assumptions: &[Self::Term]) -> Result<bool> {
        Err(ProverError::unsupported("assumption solving"))
    }
}

/// Receives the models found by [`ProverEnvironment::all_sat`], one call per
/// distinct assignment.
pub trait AllSatCallback<T> {
    type Output;

    fn apply(&mut self, model: Vec<T>);

    fn into_output(self) -> Self::Output;
}

/// Collects every model.
#[derive(Debug)]
pub struct CollectModels<T>(Vec<Vec<T>>);

impl<T> Default for CollectModels<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> AllSatCallback<T> for CollectModels<T> {
    type Output = Vec<Vec<T>>;

    fn apply(&mut self, model: Vec<T>) {
        self.0.push(model);
    }

    fn into_output(self) -> Self::Output {
        self.0
    }
}

/// Counts models without keeping them.
#[derive(Debug, Default)]
pub struct CountModels(usize);

impl<T> AllSatCallback<T> for CountModels {
    type Output = usize;

    fn apply(&mut self, _model: Vec<T>) {
        self.0 += 1;
    }

    fn into_output(self) -> usize {
        self.0
    }
}

/// A prover that accepts constraints and answers unsat-core and AllSat queries.
pub trait ProverEnvironment: BasicProver {
    /// Asserts `constraint` in the innermost scope.
    fn add_constraint(&mut self, constraint: &Self::Term) -> Result<()>;

    /// Constraints responsible for the last unsatisfiable check. Requires the
    /// prover to be created with
    /// [`ProverOption::GenerateUnsatCore`](crate::options::ProverOption::GenerateUnsatCore).
    fn unsat_core(&mut self) -> Result<Vec<Self::Term>>;

    /// Checks satisfiability under `assumptions` without keeping them asserted.
    ///
    /// # Arguments
    ///
    /// * `assumptions` - Terms assumed for this check only. Requires an empty
    ///   named-term table, i.e. no constraint added with unsat cores enabled.
    ///
    /// # Returns
    ///
    /// `None` if satisfiable, otherwise the subset of `assumptions` the engine
    /// blames, in the order the engine reports them.
    fn unsat_core_over_assumptions(
        &mut self,
        assumptions: &[Self::Term],
    ) -> Result<Option<Vec<Self::Term>>>;

    /// Hands every distinct satisfying assignment over `important` to
    /// `callback` and returns what the callback accumulated.
    fn all_sat<C: AllSatCallback<Self::Term>>(
        &mut self,
        callback: C,
        important: &[Self::Term],
    ) -> Result<C::Output>;
}
