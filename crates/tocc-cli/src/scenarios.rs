//! Named demonstration histories

use crate::error::CliError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tocc_primitives::{parse_history, Operation};

/// A named input history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Name used on the command line
    pub name: String,
    /// One-line description
    #[serde(default)]
    pub title: String,
    /// Operations in notation form, e.g. `r1(x) w1(x) c1`
    pub operations: String,
}

impl Scenario {
    fn new(name: &str, title: &str, operations: &str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            operations: operations.to_string(),
        }
    }

    /// Parse the operations of this scenario
    pub fn parse(&self) -> Result<Vec<Operation>, CliError> {
        parse_history(&self.operations).map_err(|source| CliError::Scenario {
            name: self.name.clone(),
            source,
        })
    }
}

/// Scenarios shipped with the simulator
pub fn builtin() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "serial",
            "Serial execution without conflicts",
            "r1(x) w1(x) c1 r2(x) c2",
        ),
        Scenario::new(
            "read-write-conflict",
            "Read/write conflict, T1 aborted and restarted",
            "r1(y) r2(y) w1(y) c2 c1",
        ),
        Scenario::new(
            "write-conflict",
            "Write conflict, T2 aborted by T3 and restarted",
            "w1(z) r2(z) w3(z) w2(z) w2(z) c1 c3 c2",
        ),
        Scenario::new(
            "complex-conflict",
            "T1 reads, T3 writes and commits, T1 write aborted",
            "r1(a) w3(a) c3 w1(a) c1",
        ),
        Scenario::new(
            "multiple-items",
            "Two transactions over two data items",
            "w1(x) r2(x) w1(y) r2(y) w2(x) w2(y) c1 c2",
        ),
    ]
}

/// Built-in scenarios followed by `extra`
///
/// Every scenario must parse and names must be unique.
pub fn catalog(extra: &[Scenario]) -> Result<Vec<Scenario>, CliError> {
    let mut all = builtin();
    all.extend(extra.iter().cloned());

    let mut seen = HashSet::new();
    for scenario in &all {
        if !seen.insert(scenario.name.as_str()) {
            return Err(CliError::DuplicateScenario(scenario.name.clone()));
        }
        scenario.parse()?;
    }

    Ok(all)
}

/// Look up a scenario by name
pub fn find<'a>(catalog: &'a [Scenario], name: &str) -> Result<&'a Scenario, CliError> {
    catalog
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| CliError::UnknownScenario(name.to_string()))
}
