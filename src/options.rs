use std::{collections::BTreeSet, str::FromStr};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::{ProverError, Result};

/// Options a prover is created with.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ProverOption {
    /// Name and retain every asserted constraint so that `unsat_core` can
    /// report which of them are responsible for unsatisfiability.
    GenerateUnsatCore,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProverOptions(BTreeSet<ProverOption>);

impl ProverOptions {
    /// An empty option set: no unsat cores.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `option` to the set.
    ///
    /// # Arguments
    ///
    /// * `option` - The option to enable; enabling it twice has no effect.
    ///
    /// # Returns
    ///
    /// The extended set, so calls can be chained.
    pub fn with(mut self, option: ProverOption) -> Self {
        self.0.insert(option);
        self
    }

    /// Whether `option` is enabled.
    pub fn contains(&self, option: ProverOption) -> bool {
        self.0.contains(&option)
    }

    /// The enabled options in their declaration order.
    pub fn iter(&self) -> impl Iterator<Item = ProverOption> + '_ {
        self.0.iter().copied()
    }

    /// Parses options from their names, e.g. `"GENERATE_UNSAT_CORE"`.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| {
                let name = name.as_ref().trim();
                ProverOption::from_str(name)
                    .map_err(|_| ProverError::unknown_option(name.to_string()))
            })
            .collect()
    }

    /// Loads options from a JSON array of option names.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl FromIterator<ProverOption> for ProverOptions {
    fn from_iter<I: IntoIterator<Item = ProverOption>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
