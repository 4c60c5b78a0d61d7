//! SAT oracle boundary.
//!
//! The scheduler treats the SAT solver as an opaque, blocking decision
//! procedure: one call per resolve, no partial results, no retries. A
//! refutation is a final answer for the given clause set.

mod splr_backend;

pub use splr_backend::SplrOracle;

use std::fmt::Debug;

use crate::encoding::ClauseSet;
use crate::error::Result;

/// Answer from a SAT oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleAnswer {
    /// A complete assignment: one signed literal per variable `1..=N`.
    Model(Vec<i32>),
    /// The clause set is unsatisfiable.
    Refuted,
}

impl OracleAnswer {
    /// Whether the oracle found a model.
    pub fn is_model(&self) -> bool {
        matches!(self, Self::Model(_))
    }
}

/// A SAT decision procedure.
pub trait SatOracle: Debug {
    /// Oracle name, for logging.
    fn name(&self) -> &'static str;

    /// Decides `cnf`. Only genuine solver failures are errors;
    /// unsatisfiability is [`OracleAnswer::Refuted`].
    fn solve(&self, cnf: &ClauseSet) -> Result<OracleAnswer>;
}
