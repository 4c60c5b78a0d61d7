//! `splr` CDCL backend.

use splr::{Certificate, SolverError};
use tracing::debug;

use super::{OracleAnswer, SatOracle};
use crate::encoding::ClauseSet;
use crate::error::{Result, ScheduleError};

/// SAT oracle backed by the `splr` CDCL solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplrOracle;

impl SplrOracle {
    /// Creates the oracle.
    pub fn new() -> Self {
        Self
    }
}

impl SatOracle for SplrOracle {
    fn name(&self) -> &'static str {
        "splr"
    }

    fn solve(&self, cnf: &ClauseSet) -> Result<OracleAnswer> {
        if cnf.has_empty_clause() {
            debug!(event = "oracle_short_circuit", reason = "empty_clause");
            return Ok(OracleAnswer::Refuted);
        }
        if cnf.is_empty() {
            return Ok(OracleAnswer::Model(pad_model(Vec::new(), cnf.num_vars())));
        }

        match Certificate::try_from(cnf.to_vecs()) {
            Ok(Certificate::SAT(model)) => Ok(OracleAnswer::Model(pad_model(model, cnf.num_vars()))),
            Ok(Certificate::UNSAT) => Ok(OracleAnswer::Refuted),
            // Conflicts found while loading the clauses are refutations too.
            Err(SolverError::EmptyClause)
            | Err(SolverError::Inconsistent)
            | Err(SolverError::RootLevelConflict(..)) => Ok(OracleAnswer::Refuted),
            Err(e) => Err(ScheduleError::Oracle(format!("{e:?}"))),
        }
    }
}

/// Variables that occur in no clause are unconstrained; report them false.
fn pad_model(mut model: Vec<i32>, num_vars: usize) -> Vec<i32> {
    let start = model.len() + 1;
    model.extend((start..=num_vars).filter_map(|v| i32::try_from(v).ok().map(|v| -v)));
    model
}
