//! A small engine for exercising provers in tests.
//!
//! `FakeEngine` understands boolean literals and integer bounds (`x > c`,
//! `x < c`), which is enough to produce genuine sat/unsat answers, unsat cores
//! and AllSat enumerations without a real solver.

use std::{cell::Cell, collections::HashMap, rc::Rc};

use anyhow::anyhow;

use crate::engine::{Engine, EngineError, EngineModel, EngineResult, Value, ValueAssignment};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FakeTerm {
    Var(String),
    Not(Box<FakeTerm>),
    Gt(String, i64),
    Lt(String, i64),
    Named(String, Box<FakeTerm>),
}

pub fn var(name: &str) -> FakeTerm {
    FakeTerm::Var(name.to_string())
}

pub fn lit(name: &str, positive: bool) -> FakeTerm {
    if positive {
        var(name)
    } else {
        FakeTerm::Not(Box::new(var(name)))
    }
}

pub fn gt(name: &str, c: i64) -> FakeTerm {
    FakeTerm::Gt(name.to_string(), c)
}

pub fn lt(name: &str, c: i64) -> FakeTerm {
    FakeTerm::Lt(name.to_string(), c)
}

impl FakeTerm {
    fn strip_name(&self) -> &FakeTerm {
        match self {
            FakeTerm::Named(_, inner) => inner.strip_name(),
            t => t,
        }
    }

    fn name(&self) -> Option<&str> {
        match self {
            FakeTerm::Named(name, _) => Some(name.as_str()),
            _ => None,
        }
    }

    fn as_literal(&self) -> Option<(&str, bool)> {
        match self.strip_name() {
            FakeTerm::Var(v) => Some((v.as_str(), true)),
            FakeTerm::Not(inner) => match inner.strip_name() {
                FakeTerm::Var(v) => Some((v.as_str(), false)),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Facts derived from a list of asserted terms.
struct Analysis {
    /// Indices (into the analysed terms) of two assertions that contradict
    /// each other, if any.
    conflict: Option<(usize, usize)>,
    bools: Vec<(String, bool)>,
    ints: Vec<(String, i64)>,
}

fn analyse(terms: &[&FakeTerm]) -> Analysis {
    let mut bools: Vec<(String, bool)> = Vec::new();
    let mut bool_origin: HashMap<String, usize> = HashMap::new();
    // var -> (lowest admissible value, index), (highest admissible value, index)
    let mut lower: HashMap<String, (i64, usize)> = HashMap::new();
    let mut upper: HashMap<String, (i64, usize)> = HashMap::new();
    let mut int_order: Vec<String> = Vec::new();

    for (i, term) in terms.iter().enumerate() {
        if let Some((v, positive)) = term.as_literal() {
            match bool_origin.get(v) {
                Some(&j) => {
                    if bools.iter().any(|(b, p)| b == v && *p != positive) {
                        return Analysis {
                            conflict: Some((j, i)),
                            bools,
                            ints: Vec::new(),
                        };
                    }
                }
                None => {
                    bool_origin.insert(v.to_string(), i);
                    bools.push((v.to_string(), positive));
                }
            }
            continue;
        }
        match term.strip_name() {
            FakeTerm::Gt(v, c) => {
                if !int_order.contains(v) {
                    int_order.push(v.clone());
                }
                let entry = lower.entry(v.clone()).or_insert((c + 1, i));
                if c + 1 > entry.0 {
                    *entry = (c + 1, i);
                }
            }
            FakeTerm::Lt(v, c) => {
                if !int_order.contains(v) {
                    int_order.push(v.clone());
                }
                let entry = upper.entry(v.clone()).or_insert((c - 1, i));
                if c - 1 < entry.0 {
                    *entry = (c - 1, i);
                }
            }
            _ => {}
        }
    }

    let mut ints = Vec::new();
    for v in int_order {
        match (lower.get(&v), upper.get(&v)) {
            (Some(&(lo, i)), Some(&(hi, j))) if lo > hi => {
                return Analysis {
                    conflict: Some((i.min(j), i.max(j))),
                    bools,
                    ints,
                };
            }
            (Some(&(lo, _)), _) => ints.push((v, lo)),
            (None, Some(&(hi, _))) => ints.push((v, hi)),
            (None, None) => ints.push((v, 0)),
        }
    }
    Analysis {
        conflict: None,
        bools,
        ints,
    }
}

pub struct FakeModel {
    assignments: Vec<ValueAssignment<FakeTerm>>,
    fail: bool,
    live: Rc<Cell<usize>>,
    released: Rc<Cell<usize>>,
}

impl EngineModel for FakeModel {
    type Term = FakeTerm;

    fn assignments(&self) -> EngineResult<Vec<ValueAssignment<FakeTerm>>> {
        if self.fail {
            return Err(anyhow!("model extraction failed").into());
        }
        Ok(self.assignments.clone())
    }
}

impl Drop for FakeModel {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
        self.released.set(self.released.get() + 1);
    }
}

pub struct FakeEngine {
    /// Asserted terms per scope; the first frame is depth 0.
    frames: Vec<Vec<FakeTerm>>,
    interrupted: bool,
    pub fail_model_extraction: bool,
    /// Interrupt AllSat after this many models have been delivered.
    pub interrupt_all_sat_after: Option<usize>,
    /// Report a core name that was never annotated.
    pub report_unknown_core_name: bool,
    /// Report core names last-asserted first instead of in assertion order.
    pub reverse_core: bool,
    live: Rc<Cell<usize>>,
    released: Rc<Cell<usize>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            frames: vec![Vec::new()],
            interrupted: false,
            fail_model_extraction: false,
            interrupt_all_sat_after: None,
            report_unknown_core_name: false,
            reverse_core: false,
            live: Rc::new(Cell::new(0)),
            released: Rc::new(Cell::new(0)),
        }
    }

    /// Makes every following check fail with [`EngineError::Interrupted`].
    pub fn interrupt(&mut self) {
        self.interrupted = true;
    }

    pub fn live_models(&self) -> usize {
        self.live.get()
    }

    pub fn released_models(&self) -> usize {
        self.released.get()
    }

    fn asserted(&self) -> Vec<&FakeTerm> {
        self.frames.iter().flatten().collect()
    }
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for FakeEngine {
    type Term = FakeTerm;
    type Model = FakeModel;

    fn push(&mut self, n: usize) -> EngineResult<()> {
        for _ in 0..n {
            self.frames.push(Vec::new());
        }
        Ok(())
    }

    fn pop(&mut self, n: usize) -> EngineResult<()> {
        if n > self.stack_depth() {
            return Err(EngineError::Solver(format!(
                "cannot pop {} scopes at depth {}",
                n,
                self.stack_depth()
            )));
        }
        self.frames.truncate(self.frames.len() - n);
        Ok(())
    }

    fn assert_term(&mut self, term: &FakeTerm) -> EngineResult<()> {
        if let Some(frame) = self.frames.last_mut() {
            frame.push(term.clone());
        }
        Ok(())
    }

    fn annotate(&mut self, term: &FakeTerm, name: &str) -> EngineResult<FakeTerm> {
        Ok(FakeTerm::Named(name.to_string(), Box::new(term.clone())))
    }

    fn check_sat(&mut self) -> EngineResult<bool> {
        if self.interrupted {
            return Err(EngineError::Interrupted);
        }
        Ok(analyse(&self.asserted()).conflict.is_none())
    }

    fn unsat_core(&mut self) -> EngineResult<Vec<String>> {
        if self.report_unknown_core_name {
            return Ok(vec!["term_unknown".to_string()]);
        }
        let asserted = self.asserted();
        let Some((i, j)) = analyse(&asserted).conflict else {
            return Err(EngineError::Solver("no unsat core: last check was sat".to_string()));
        };
        let mut names: Vec<String> = [asserted[i], asserted[j]]
            .iter()
            .filter_map(|t| t.name().map(str::to_string))
            .collect();
        if self.reverse_core {
            names.reverse();
        }
        Ok(names)
    }

    fn model(&mut self) -> EngineResult<FakeModel> {
        let analysis = analyse(&self.asserted());
        let assignments = analysis
            .bools
            .into_iter()
            .map(|(v, b)| ValueAssignment::new(var(&v), v, Value::Bool(b)))
            .chain(
                analysis
                    .ints
                    .into_iter()
                    .map(|(v, n)| ValueAssignment::new(var(&v), v, Value::Int(n))),
            )
            .collect();
        self.live.set(self.live.get() + 1);
        Ok(FakeModel {
            assignments,
            fail: self.fail_model_extraction,
            live: Rc::clone(&self.live),
            released: Rc::clone(&self.released),
        })
    }

    fn all_sat(
        &mut self,
        important: &[FakeTerm],
        on_model: &mut dyn FnMut(&[FakeTerm]),
    ) -> EngineResult<()> {
        if self.interrupted {
            return Err(EngineError::Interrupted);
        }
        let vars = important
            .iter()
            .map(|t| match t.as_literal() {
                Some((v, true)) => Ok(v.to_string()),
                _ => Err(EngineError::Solver(format!(
                    "important term {:?} is not a variable",
                    t
                ))),
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let mut delivered = 0;
        for mask in 0u64..(1 << vars.len()) {
            let literals: Vec<FakeTerm> = vars
                .iter()
                .enumerate()
                .map(|(i, v)| lit(v, mask & (1 << i) != 0))
                .collect();
            let mut terms = self.asserted();
            terms.extend(literals.iter());
            if analyse(&terms).conflict.is_some() {
                continue;
            }
            if self.interrupt_all_sat_after == Some(delivered) {
                return Err(EngineError::Interrupted);
            }
            on_model(&literals);
            delivered += 1;
        }
        Ok(())
    }

    fn stack_depth(&self) -> usize {
        self.frames.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_fake_engine_reports_conflicting_named_terms() {
        let mut engine = FakeEngine::new();
        engine.assert_term(&gt("x", 3)).unwrap();
        let named = engine.annotate(&lt("x", 2), "term_a").unwrap();
        engine.assert_term(&named).unwrap();
        assert!(!engine.check_sat().unwrap());
        assert_eq!(engine.unsat_core().unwrap(), vec!["term_a".to_string()]);
    }

    #[test]
    fn test_fake_engine_can_reverse_its_core() {
        let mut engine = FakeEngine::new();
        for (term, name) in [(lit("a", true), "term_a"), (lit("a", false), "term_b")] {
            let named = engine.annotate(&term, name).unwrap();
            engine.assert_term(&named).unwrap();
        }
        assert_eq!(engine.unsat_core().unwrap(), vec!["term_a", "term_b"]);
        engine.reverse_core = true;
        assert_eq!(engine.unsat_core().unwrap(), vec!["term_b", "term_a"]);
    }

    #[test]
    fn test_fake_engine_all_sat_respects_assertions() {
        let mut engine = FakeEngine::new();
        engine.assert_term(&lit("a", true)).unwrap();
        let mut models = Vec::new();
        engine
            .all_sat(&[var("a"), var("b")], &mut |m| models.push(m.to_vec()))
            .unwrap();
        assert_eq!(
            models,
            vec![
                vec![lit("a", true), lit("b", false)],
                vec![lit("a", true), lit("b", true)],
            ]
        );
    }
}
