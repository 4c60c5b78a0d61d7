//! Constraint encoder: lattice → CNF.
//!
//! # Rules
//!
//! | Rule | Clauses |
//! |------|---------|
//! | `JobCoverage` | per job: `∨ D_ijk` over every team and day |
//! | `DayImpliesJob` | `¬D_ijk ∨ J_ij` |
//! | `JobImpliesTeam` | `¬J_ij ∨ T_i` |
//! | `SingleDay` | `¬D_ijk ∨ ¬D_ijk'` for k < k' |
//! | `JobDayExclusive` | `¬D_ijk ∨ ¬D_i'jk` for i < i' |
//! | `CapacityOverlap` | `¬D_ijk ∨ ¬D_ij'k` when the pair overlaps |
//! | `TeamActivity` | `¬T_i ∨ J_i1 ∨ … ∨ J_in` |
//! | `SingleTeam` | `¬J_ij ∨ ¬J_i'j` for i < i' |
//! | `JobSupport` | `¬J_ij ∨ D_ij1 ∨ … ∨ D_ijm` |
//! | `JobTooLong` | `¬D_ijk` when job `j` alone exceeds day `k` |
//!
//! Together, coverage, single-team, job support and single-day make
//! exactly one `D` true per job in every model.
//!
//! # Order
//! Team by team (and job by job within each team) first, then job by job
//! for the cross-team rules. The output is a pure function of the input.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info};

use super::{Clause, ClauseSet, Literal, OverlapOracle};
use crate::lattice::{CnfVar, DayIx, JobIx, Lattice, LatticeError, TeamIx, VarIx};
use crate::models::{Job, PayPeriod};

/// Clause family, for bookkeeping and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
    JobCoverage,
    DayImpliesJob,
    JobImpliesTeam,
    SingleDay,
    JobDayExclusive,
    CapacityOverlap,
    TeamActivity,
    SingleTeam,
    JobSupport,
    JobTooLong,
}

impl Rule {
    /// Short snake-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::JobCoverage => "job_coverage",
            Self::DayImpliesJob => "day_implies_job",
            Self::JobImpliesTeam => "job_implies_team",
            Self::SingleDay => "single_day",
            Self::JobDayExclusive => "job_day_exclusive",
            Self::CapacityOverlap => "capacity_overlap",
            Self::TeamActivity => "team_activity",
            Self::SingleTeam => "single_team",
            Self::JobSupport => "job_support",
            Self::JobTooLong => "job_too_long",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Clause counts per rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodingStats {
    counts: BTreeMap<Rule, usize>,
}

impl EncodingStats {
    fn record(&mut self, rule: Rule) {
        *self.counts.entry(rule).or_insert(0) += 1;
    }

    /// Clauses emitted for `rule`.
    pub fn count(&self, rule: Rule) -> usize {
        self.counts.get(&rule).copied().unwrap_or(0)
    }

    /// Total clauses emitted.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// `(rule, count)` pairs in rule order, skipping rules that emitted nothing.
    pub fn iter(&self) -> impl Iterator<Item = (Rule, usize)> + '_ {
        self.counts.iter().map(|(&r, &c)| (r, c))
    }
}

/// Encoder output.
#[derive(Debug, Clone)]
pub struct Encoding {
    /// The clause set handed to the oracle.
    pub cnf: ClauseSet,
    /// Per-rule clause counts.
    pub stats: EncodingStats,
}

/// Builds the clause set from a frozen lattice.
#[derive(Debug)]
pub struct ConstraintEncoder<'a> {
    lattice: &'a Lattice,
    jobs: &'a [Job],
    period: &'a PayPeriod,
    oracle: OverlapOracle<'a>,
}

struct Emitter {
    cnf: ClauseSet,
    stats: EncodingStats,
}

impl Emitter {
    fn emit(&mut self, rule: Rule, clause: Clause) {
        self.stats.record(rule);
        self.cnf.push(clause);
    }
}

impl<'a> ConstraintEncoder<'a> {
    /// Creates an encoder.
    pub fn new(
        lattice: &'a Lattice,
        jobs: &'a [Job],
        period: &'a PayPeriod,
        oracle: OverlapOracle<'a>,
    ) -> Self {
        Self {
            lattice,
            jobs,
            period,
            oracle,
        }
    }

    /// Encodes every rule.
    ///
    /// Fails if the lattice is incomplete or does not match the registered
    /// jobs and pay period.
    pub fn encode(&self) -> Result<Encoding, LatticeError> {
        self.check_shape()?;

        let mut out = Emitter {
            cnf: ClauseSet::new(self.lattice.var_count()),
            stats: EncodingStats::default(),
        };

        for t in 0..self.lattice.team_count() {
            self.encode_team(TeamIx(t), &mut out)?;
        }
        for j in 0..self.lattice.job_count() {
            self.encode_job(JobIx(j), &mut out)?;
        }

        for (rule, count) in out.stats.iter() {
            debug!(event = "encode_rule", rule = %rule, clauses = count);
        }
        info!(
            event = "encode_end",
            variables = out.cnf.num_vars(),
            clauses = out.cnf.len(),
        );

        Ok(Encoding {
            cnf: out.cnf,
            stats: out.stats,
        })
    }

    fn check_shape(&self) -> Result<(), LatticeError> {
        if self.lattice.job_count() != self.jobs.len() {
            return Err(LatticeError::ShapeMismatch {
                kind: "jobs",
                lattice: self.lattice.job_count(),
                entities: self.jobs.len(),
            });
        }
        if self.lattice.day_count() != self.period.len() {
            return Err(LatticeError::ShapeMismatch {
                kind: "days",
                lattice: self.lattice.day_count(),
                entities: self.period.len(),
            });
        }
        self.lattice.check_complete()
    }

    /// Per-team rules: activity, implications, job support, single day,
    /// single-job capacity, then pairwise capacity per day.
    fn encode_team(&self, team: TeamIx, out: &mut Emitter) -> Result<(), LatticeError> {
        let t_var = self.lattice.team_var(team)?;
        let t = t_var.ix;

        let activity = std::iter::once(Literal::neg(t))
            .chain(t_var.children.iter().map(|&j| Literal::pos(j)))
            .collect();
        out.emit(Rule::TeamActivity, activity);

        for &j_ix in &t_var.children {
            let j_var = self.lattice.var(j_ix)?;
            out.emit(Rule::JobImpliesTeam, Clause::implies(j_ix, t));

            let support = std::iter::once(Literal::neg(j_ix))
                .chain(j_var.children.iter().map(|&d| Literal::pos(d)))
                .collect();
            out.emit(Rule::JobSupport, support);

            for &d_ix in &j_var.children {
                out.emit(Rule::DayImpliesJob, Clause::implies(d_ix, j_ix));
                if self.oracle.exceeds_alone(&self.lattice.var(d_ix)?.mapping) {
                    out.emit(Rule::JobTooLong, Clause::new(vec![Literal::neg(d_ix)]));
                }
            }

            for_each_pair(&j_var.children, |a, b| {
                out.emit(Rule::SingleDay, Clause::at_most_one_of(a, b));
            });
        }

        for k in 0..self.lattice.day_count() {
            let day_vars = (0..self.lattice.job_count())
                .map(|j| self.lattice.day_var(team, JobIx(j), DayIx(k)))
                .collect::<Result<Vec<&CnfVar>, _>>()?;
            for (n, a) in day_vars.iter().enumerate() {
                for b in &day_vars[n + 1..] {
                    if self.oracle.overlaps(&a.mapping, &b.mapping) {
                        out.emit(Rule::CapacityOverlap, Clause::at_most_one_of(a.ix, b.ix));
                    }
                }
            }
        }
        Ok(())
    }

    /// Cross-team rules for one job: coverage, single team, then
    /// job-day exclusivity day by day.
    fn encode_job(&self, job: JobIx, out: &mut Emitter) -> Result<(), LatticeError> {
        let teams = self.lattice.team_count();
        let days = self.lattice.day_count();

        let mut coverage = Vec::with_capacity(teams * days);
        let mut holders = Vec::with_capacity(teams);
        for t in 0..teams {
            let j_var = self.lattice.job_var(TeamIx(t), job)?;
            holders.push(j_var.ix);
            coverage.extend(j_var.children.iter().map(|&d| Literal::pos(d)));
        }
        out.emit(Rule::JobCoverage, Clause::new(coverage));

        for_each_pair(&holders, |a, b| {
            out.emit(Rule::SingleTeam, Clause::at_most_one_of(a, b));
        });

        for k in 0..days {
            let same_day = (0..teams)
                .map(|t| self.lattice.day_var(TeamIx(t), job, DayIx(k)).map(|v| v.ix))
                .collect::<Result<Vec<VarIx>, _>>()?;
            for_each_pair(&same_day, |a, b| {
                out.emit(Rule::JobDayExclusive, Clause::at_most_one_of(a, b));
            });
        }
        Ok(())
    }
}

/// Calls `f` on every unordered pair `(vars[i], vars[j])` with `i < j`.
fn for_each_pair(vars: &[VarIx], mut f: impl FnMut(VarIx, VarIx)) {
    for (n, &a) in vars.iter().enumerate() {
        for &b in &vars[n + 1..] {
            f(a, b);
        }
    }
}
