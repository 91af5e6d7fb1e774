//! The assertion stack underneath every prover.
//!
//! A [`Session`] mirrors the engine's scope stack: every push opens a scope on
//! both sides and every pop closes one on both sides. Each scope keeps the raw
//! terms asserted at that level so they can be inspected or re-asserted.

use log::{debug, trace};

use super::{BasicProver, ScopedModel};
use crate::{
    engine::Engine,
    error::{ProverError, Result},
};

pub struct Session<E: Engine> {
    engine: E,
    /// Raw assertions per scope, innermost last. The first entry is the base
    /// scope at the engine's initial depth and is never popped.
    scopes: Vec<Vec<E::Term>>,
    /// Engine depth when the session was created.
    floor: usize,
    closed: bool,
}

impl<E: Engine> Session<E> {
    pub fn new(engine: E) -> Self {
        let floor = engine.stack_depth();
        Self {
            engine,
            scopes: vec![Vec::new()],
            floor,
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of scopes pushed and not yet popped.
    pub fn depth(&self) -> usize {
        self.scopes.len().saturating_sub(1)
    }

    /// Every raw assertion of the live scopes, outermost first.
    pub fn assertions(&self) -> impl Iterator<Item = &E::Term> {
        self.scopes.iter().flatten()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub(crate) fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(ProverError::closed());
        }
        Ok(())
    }

    /// Appends `term` to the innermost scope's record.
    pub(crate) fn record(&mut self, term: E::Term) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.push(term);
        }
    }

    fn debug_check_in_sync(&self) {
        debug_assert_eq!(
            self.depth(),
            self.engine.stack_depth().saturating_sub(self.floor),
            "session scope stack out of sync with the engine"
        );
    }
}

impl<E: Engine> BasicProver for Session<E> {
    type Term = E::Term;
    type Model = E::Model;

    fn push(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.engine.push(1)?;
        self.scopes.push(Vec::new());
        trace!("push: depth {}", self.depth());
        self.debug_check_in_sync();
        Ok(())
    }

    fn pop(&mut self) -> Result<()> {
        self.ensure_open()?;
        if self.depth() == 0 {
            return Err(ProverError::scope_underflow());
        }
        self.engine.pop(1)?;
        self.scopes.pop();
        trace!("pop: depth {}", self.depth());
        self.debug_check_in_sync();
        Ok(())
    }

    fn is_unsat(&mut self) -> Result<bool> {
        self.ensure_open()?;
        let sat = self.engine.check_sat()?;
        debug!(
            "check at depth {}: {}",
            self.depth(),
            if sat { "sat" } else { "unsat" }
        );
        Ok(!sat)
    }

    fn get_model(&mut self) -> Result<ScopedModel<'_, E::Model>> {
        self.ensure_open()?;
        Ok(ScopedModel::new(self.engine.model()?))
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(ProverError::already_closed());
        }
        self.closed = true;
        self.scopes.clear();
        let depth = self.engine.stack_depth().saturating_sub(self.floor);
        debug!("close: unwinding {} engine scopes", depth);
        if depth > 0 {
            self.engine.pop(depth)?;
        }
        Ok(())
    }
}
