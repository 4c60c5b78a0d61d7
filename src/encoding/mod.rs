//! CNF encoding of the crew scheduling problem.
//!
//! Translates the frozen variable lattice into a clause set that a SAT
//! oracle can decide. A model of the clause set is a valid schedule and
//! vice versa.
//!
//! # Clause Representation
//! A [`Literal`] is a variable index with a polarity. A [`Clause`] is a
//! disjunction of literals; a [`ClauseSet`] is their conjunction. The
//! DIMACS view (`±index` as `i32`) is what crosses the oracle boundary.
//!
//! # Reference
//! Biere et al. (2009), "Handbook of Satisfiability", Ch. 2 (CNF encodings)

mod encoder;
mod overlap;

pub use encoder::{ConstraintEncoder, Encoding, EncodingStats, Rule};
pub use overlap::OverlapOracle;

use std::fmt::{self, Write as _};
use std::ops::Not;

use crate::lattice::VarIx;

/// A signed literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    var: VarIx,
    positive: bool,
}

impl Literal {
    /// `var` is true.
    pub fn pos(var: VarIx) -> Self {
        Self {
            var,
            positive: true,
        }
    }

    /// `var` is false.
    pub fn neg(var: VarIx) -> Self {
        Self {
            var,
            positive: false,
        }
    }

    /// Parses a DIMACS literal. Returns `None` for 0.
    pub fn from_dimacs(lit: i32) -> Option<Self> {
        let var = VarIx::new(lit.unsigned_abs())?;
        Some(Self {
            var,
            positive: lit > 0,
        })
    }

    /// The variable.
    #[inline]
    pub fn var(self) -> VarIx {
        self.var
    }

    /// Whether the literal asserts its variable true.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.positive
    }

    /// DIMACS form.
    #[inline]
    pub fn to_dimacs(self) -> i32 {
        // VarIx never exceeds i32::MAX.
        let raw = self.var.get() as i32;
        if self.positive {
            raw
        } else {
            -raw
        }
    }

    /// Whether the literal holds under `truth` (indexed by variable slot).
    fn holds(self, truth: &[bool]) -> bool {
        truth
            .get(self.var.slot())
            .is_some_and(|&value| value == self.positive)
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self {
        Self {
            var: self.var,
            positive: !self.positive,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

/// A disjunction of literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause(Vec<Literal>);

impl Clause {
    /// Creates a clause.
    pub fn new(literals: Vec<Literal>) -> Self {
        Self(literals)
    }

    /// `¬a ∨ ¬b`: `a` and `b` are not both true.
    pub fn at_most_one_of(a: VarIx, b: VarIx) -> Self {
        Self(vec![Literal::neg(a), Literal::neg(b)])
    }

    /// `¬premise ∨ conclusion`.
    pub fn implies(premise: VarIx, conclusion: VarIx) -> Self {
        Self(vec![Literal::neg(premise), Literal::pos(conclusion)])
    }

    /// The literals.
    pub fn literals(&self) -> &[Literal] {
        &self.0
    }

    /// Number of literals.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the clause has no literals (always false).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// DIMACS form.
    pub fn to_dimacs(&self) -> Vec<i32> {
        self.0.iter().map(|l| l.to_dimacs()).collect()
    }

    /// Whether some literal holds under `truth`.
    pub fn is_satisfied_by(&self, truth: &[bool]) -> bool {
        self.0.iter().any(|l| l.holds(truth))
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// An ordered conjunction of clauses over variables `1..=num_vars`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClauseSet {
    num_vars: usize,
    clauses: Vec<Clause>,
}

impl ClauseSet {
    /// Creates an empty clause set over `num_vars` variables.
    pub fn new(num_vars: usize) -> Self {
        Self {
            num_vars,
            clauses: Vec::new(),
        }
    }

    /// Appends a clause.
    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Number of variables.
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Number of clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Whether there are no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Clauses in emission order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Whether some clause is empty, which makes the set unsatisfiable.
    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(Clause::is_empty)
    }

    /// Clauses as DIMACS integer vectors.
    pub fn to_vecs(&self) -> Vec<Vec<i32>> {
        self.clauses.iter().map(Clause::to_dimacs).collect()
    }

    /// Position of the first clause not satisfied by `truth`, if any.
    ///
    /// `truth[i]` is the value of variable `i + 1`.
    pub fn first_unsatisfied(&self, truth: &[bool]) -> Option<usize> {
        self.clauses.iter().position(|c| !c.is_satisfied_by(truth))
    }

    /// Renders the set in DIMACS CNF format.
    pub fn to_dimacs(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "p cnf {} {}", self.num_vars, self.clauses.len());
        for clause in &self.clauses {
            for lit in clause.literals() {
                let _ = write!(out, "{lit} ");
            }
            out.push_str("0\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(raw: u32) -> VarIx {
        VarIx::new(raw).unwrap()
    }

    #[test]
    fn test_literal_dimacs() {
        assert_eq!(Literal::pos(v(3)).to_dimacs(), 3);
        assert_eq!(Literal::neg(v(3)).to_dimacs(), -3);
        assert_eq!(!Literal::pos(v(3)), Literal::neg(v(3)));
        assert_eq!(Literal::from_dimacs(-5), Some(Literal::neg(v(5))));
        assert_eq!(Literal::from_dimacs(0), None);
    }

    #[test]
    fn test_clause_helpers() {
        assert_eq!(Clause::at_most_one_of(v(1), v(2)).to_dimacs(), vec![-1, -2]);
        assert_eq!(Clause::implies(v(4), v(2)).to_dimacs(), vec![-4, 2]);
        assert!(Clause::new(Vec::new()).is_empty());
    }

    #[test]
    fn test_satisfaction() {
        let mut set = ClauseSet::new(2);
        set.push(Clause::implies(v(1), v(2)));
        set.push(Clause::new(vec![Literal::pos(v(1))]));

        assert_eq!(set.first_unsatisfied(&[true, true]), None);
        assert_eq!(set.first_unsatisfied(&[true, false]), Some(0));
        assert_eq!(set.first_unsatisfied(&[false, true]), Some(1));
        // Missing values never satisfy a literal.
        assert_eq!(set.first_unsatisfied(&[]), Some(0));
    }

    #[test]
    fn test_to_dimacs() {
        let mut set = ClauseSet::new(3);
        set.push(Clause::new(vec![Literal::pos(v(1)), Literal::neg(v(2))]));
        set.push(Clause::new(vec![Literal::pos(v(3))]));

        assert_eq!(set.to_dimacs(), "p cnf 3 2\n1 -2 0\n3 0\n");
        assert_eq!(set.to_vecs(), vec![vec![1, -2], vec![3]]);
        assert!(!set.has_empty_clause());
    }
}
