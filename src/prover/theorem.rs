//! A prover that names the terms it asserts so that unsat cores reported by
//! the engine can be mapped back to the caller's terms.
//!
//! Solving under assumptions is emulated on engines that only support named,
//! permanently asserted terms: the assumptions are named and asserted inside a
//! fresh scope, the scope is checked, the core (if any) is read back, and the
//! scope is popped again.

use std::collections::HashMap;

use itertools::Itertools;
use log::{debug, error, trace};

use super::{
    naming::generate_term_name, AllSatCallback, BasicProver, ProverEnvironment, ScopedModel,
    Session,
};
use crate::{
    engine::Engine,
    error::{ProverError, Result},
    options::{ProverOption, ProverOptions},
};

pub struct TheoremProver<E: Engine> {
    session: Session<E>,
    /// Original term behind every name currently asserted.
    named_terms: HashMap<String, E::Term>,
    /// Names asserted in each live scope, parallel to the session's scopes.
    scope_names: Vec<Vec<String>>,
    generate_unsat_cores: bool,
}

impl<E: Engine> TheoremProver<E> {
    pub fn new(engine: E, options: &ProverOptions) -> Self {
        Self {
            session: Session::new(engine),
            named_terms: HashMap::new(),
            scope_names: vec![Vec::new()],
            generate_unsat_cores: options.contains(ProverOption::GenerateUnsatCore),
        }
    }

    pub fn session(&self) -> &Session<E> {
        &self.session
    }

    /// Number of entries in the named-term table.
    pub fn named_terms(&self) -> usize {
        self.named_terms.len()
    }

    fn assert_named(&mut self, term: &E::Term) -> Result<()> {
        let name = generate_term_name();
        let engine = self.session.engine_mut();
        let annotated = engine.annotate(term, &name)?;
        engine.assert_term(&annotated)?;
        trace!("asserted {:?} as {}", term, name);
        self.named_terms.insert(name.clone(), term.clone());
        if let Some(names) = self.scope_names.last_mut() {
            names.push(name);
        }
        Ok(())
    }

    /// Maps the engine's core names back to the terms they were given for.
    fn resolve_unsat_core(&mut self) -> Result<Vec<E::Term>> {
        let names = self.session.engine_mut().unsat_core()?;
        debug!("unsat core: [{}]", names.iter().join(", "));
        names
            .into_iter()
            .map(|name| match self.named_terms.get(&name) {
                Some(term) => Ok(term.clone()),
                None => {
                    error!("engine reported unknown core name {}", name);
                    Err(ProverError::unresolved_core_name(name))
                }
            })
            .collect()
    }

    /// Asserts the assumptions in the current scope and checks them.
    fn check_assumptions(&mut self, assumptions: &[E::Term]) -> Result<Option<Vec<E::Term>>> {
        for assumption in assumptions {
            self.assert_named(assumption)?;
        }
        if !self.is_unsat()? {
            return Ok(None);
        }
        self.resolve_unsat_core().map(Some)
    }
}

impl<E: Engine> BasicProver for TheoremProver<E> {
    type Term = E::Term;
    type Model = E::Model;

    fn push(&mut self) -> Result<()> {
        self.session.push()?;
        self.scope_names.push(Vec::new());
        Ok(())
    }

    fn pop(&mut self) -> Result<()> {
        self.session.pop()?;
        if let Some(names) = self.scope_names.pop() {
            for name in names {
                self.named_terms.remove(&name);
            }
        }
        Ok(())
    }

    fn is_unsat(&mut self) -> Result<bool> {
        self.session.is_unsat()
    }

    fn get_model(&mut self) -> Result<ScopedModel<'_, E::Model>> {
        self.session.get_model()
    }

    fn close(&mut self) -> Result<()> {
        if self.session.is_closed() {
            return Err(ProverError::already_closed());
        }
        self.named_terms.clear();
        self.scope_names.clear();
        self.session.close()
    }
}

impl<E: Engine> ProverEnvironment for TheoremProver<E> {
    fn add_constraint(&mut self, constraint: &E::Term) -> Result<()> {
        self.session.ensure_open()?;
        if self.generate_unsat_cores {
            self.assert_named(constraint)?;
        } else {
            self.session.engine_mut().assert_term(constraint)?;
        }
        self.session.record(constraint.clone());
        Ok(())
    }

    fn unsat_core(&mut self) -> Result<Vec<E::Term>> {
        self.session.ensure_open()?;
        if !self.generate_unsat_cores {
            return Err(ProverError::unsat_cores_disabled());
        }
        self.resolve_unsat_core()
    }

    fn unsat_core_over_assumptions(
        &mut self,
        assumptions: &[E::Term],
    ) -> Result<Option<Vec<E::Term>>> {
        self.session.ensure_open()?;
        if !self.named_terms.is_empty() {
            return Err(ProverError::named_terms_not_empty(self.named_terms.len()));
        }
        self.push()?;
        let outcome = self.check_assumptions(assumptions);
        // The scope goes away whatever the outcome; a failure to pop only
        // surfaces if the check itself succeeded.
        let popped = self.pop();
        let core = outcome?;
        popped?;
        debug!(
            "{} assumptions: {}",
            assumptions.len(),
            match &core {
                Some(core) => format!("unsat, core of {}", core.len()),
                None => "sat".to_string(),
            }
        );
        Ok(core)
    }

    fn all_sat<C: AllSatCallback<Self::Term>>(
        &mut self,
        mut callback: C,
        important: &[E::Term],
    ) -> Result<C::Output> {
        self.session.ensure_open()?;
        let mut models = 0usize;
        self.session
            .engine_mut()
            .all_sat(important, &mut |model: &[E::Term]| {
                models += 1;
                callback.apply(model.to_vec());
            })?;
        debug!(
            "all-sat over {} important terms: {} models",
            important.len(),
            models
        );
        Ok(callback.into_output())
    }
}
