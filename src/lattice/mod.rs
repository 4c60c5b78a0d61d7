//! Variable lattice: the team × job × day Boolean variable arena.
//!
//! Every scheduling fact is a CNF variable:
//!
//! | Category | Meaning | Children |
//! |----------|---------|----------|
//! | `T_i` | team `i` is active in the period | one `J_ij` per job |
//! | `J_ij` | team `i` holds job `j` | one `D_ijk` per day |
//! | `D_ijk` | team `i` does job `j` on day `k` | none |
//!
//! Variables live in a single arena indexed by [`VarIx`]. Indices are
//! minted monotonically and never renumbered, because emitted clauses
//! refer to them directly.
//!
//! # Completeness
//! Registering a team after jobs exist, or a job after teams exist,
//! materializes the missing `J`/`D` subtrees immediately. The child lists
//! are therefore always ordered by job (for `T`) and by day (for `J`),
//! whatever the registration order.

mod index;

pub use index::{DayIx, JobIx, TeamIx, VarIx};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::trace;

/// Variable category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarCategory {
    /// `T`: team active.
    TeamActive,
    /// `J`: job assigned to team.
    JobTeam,
    /// `D`: job assigned to team on a day.
    JobTeamDay,
}

impl VarCategory {
    /// Single-letter tag (`T`, `J`, `D`).
    pub fn tag(self) -> char {
        match self {
            Self::TeamActive => 'T',
            Self::JobTeam => 'J',
            Self::JobTeamDay => 'D',
        }
    }
}

impl fmt::Display for VarCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Semantic position a variable stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarMapping {
    pub team: TeamIx,
    pub job: Option<JobIx>,
    pub day: Option<DayIx>,
}

impl VarMapping {
    /// Mapping of a `T` variable.
    pub fn team(team: TeamIx) -> Self {
        Self {
            team,
            job: None,
            day: None,
        }
    }

    /// Mapping of a `J` variable.
    pub fn job(team: TeamIx, job: JobIx) -> Self {
        Self {
            team,
            job: Some(job),
            day: None,
        }
    }

    /// Mapping of a `D` variable.
    pub fn day(team: TeamIx, job: JobIx, day: DayIx) -> Self {
        Self {
            team,
            job: Some(job),
            day: Some(day),
        }
    }

    /// Whether this mapping has the shape required by `category`.
    pub fn fits(&self, category: VarCategory) -> bool {
        match category {
            VarCategory::TeamActive => self.job.is_none() && self.day.is_none(),
            VarCategory::JobTeam => self.job.is_some() && self.day.is_none(),
            VarCategory::JobTeamDay => self.job.is_some() && self.day.is_some(),
        }
    }
}

impl fmt::Display for VarMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.team)?;
        if let Some(job) = self.job {
            write!(f, ", {job}")?;
        }
        if let Some(day) = self.day {
            write!(f, ", {day}")?;
        }
        write!(f, ")")
    }
}

/// A variable in the lattice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CnfVar {
    /// CNF index.
    pub ix: VarIx,
    /// `T`, `J` or `D`.
    pub category: VarCategory,
    /// Team/job/day this variable stands for.
    pub mapping: VarMapping,
    /// Variables one level below (T → J, J → D), in job/day order.
    pub children: Vec<VarIx>,
}

/// Lattice invariant violation.
///
/// These indicate a defect in the caller or the allocator; they abort the
/// operation rather than being tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LatticeError {
    #[error("{kind} index {index} out of range (have {len})")]
    OutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error("variable {var} ({category}) has {actual} children, expected {expected}")]
    Incomplete {
        var: VarIx,
        category: VarCategory,
        actual: usize,
        expected: usize,
    },

    #[error("mapping {mapping} does not fit category {category}")]
    MappingMismatch {
        category: VarCategory,
        mapping: VarMapping,
    },

    #[error("variable {var} is {found}, expected {expected} at {mapping}")]
    Misplaced {
        var: VarIx,
        found: VarCategory,
        expected: VarCategory,
        mapping: VarMapping,
    },

    #[error("lattice has {lattice} {kind}, but {entities} are registered")]
    ShapeMismatch {
        kind: &'static str,
        lattice: usize,
        entities: usize,
    },

    #[error("CNF variable index space exhausted")]
    Exhausted,
}

/// The variable arena plus the per-team roots.
#[derive(Debug, Clone, Default)]
pub struct Lattice {
    vars: Vec<CnfVar>,
    team_roots: Vec<VarIx>,
    job_count: usize,
    day_count: usize,
    var_limit: Option<usize>,
}

impl Lattice {
    /// Creates an empty lattice for a pay period of `day_count` days.
    pub fn new(day_count: usize) -> Self {
        Self {
            day_count,
            ..Self::default()
        }
    }

    /// Caps the number of variables below the DIMACS index bound.
    pub fn with_var_limit(mut self, limit: usize) -> Self {
        self.var_limit = Some(limit);
        self
    }

    /// Variable count of a complete lattice: `teams * (1 + jobs * (1 + days))`.
    pub fn expected_var_count(teams: usize, jobs: usize, days: usize) -> usize {
        teams * (1 + jobs * (1 + days))
    }

    /// Mints a fresh variable and returns its index.
    pub fn allocate(
        &mut self,
        category: VarCategory,
        mapping: VarMapping,
    ) -> Result<VarIx, LatticeError> {
        if !mapping.fits(category) {
            return Err(LatticeError::MappingMismatch { category, mapping });
        }
        if self.var_limit.is_some_and(|limit| self.vars.len() >= limit) {
            return Err(LatticeError::Exhausted);
        }
        let ix = VarIx::from_slot(self.vars.len()).ok_or(LatticeError::Exhausted)?;
        trace!(var = %ix, category = %category, mapping = %mapping, "allocate");
        self.vars.push(CnfVar {
            ix,
            category,
            mapping,
            children: Vec::new(),
        });
        Ok(ix)
    }

    /// Registers a new team and materializes its `J`/`D` subtree for every
    /// existing job. On failure the lattice is left as it was.
    pub fn register_team(&mut self) -> Result<TeamIx, LatticeError> {
        let mark = self.vars.len();
        let team = TeamIx(self.team_roots.len());
        let expanded = self
            .allocate(VarCategory::TeamActive, VarMapping::team(team))
            .and_then(|root| {
                self.team_roots.push(root);
                (0..self.job_count).try_for_each(|j| self.make_inner_vars(team, JobIx(j)))
            });
        match expanded {
            Ok(()) => Ok(team),
            Err(e) => {
                self.rollback(mark);
                Err(e)
            }
        }
    }

    /// Registers a new job and materializes its `J`/`D` subtree for every
    /// existing team. On failure the lattice is left as it was.
    pub fn register_job(&mut self) -> Result<JobIx, LatticeError> {
        let mark = self.vars.len();
        let job = JobIx(self.job_count);
        let expanded =
            (0..self.team_roots.len()).try_for_each(|t| self.make_inner_vars(TeamIx(t), job));
        match expanded {
            Ok(()) => {
                self.job_count += 1;
                Ok(job)
            }
            Err(e) => {
                self.rollback(mark);
                Err(e)
            }
        }
    }

    /// Drops every variable minted at or after slot `mark`.
    fn rollback(&mut self, mark: usize) {
        self.vars.truncate(mark);
        for var in &mut self.vars {
            var.children.retain(|c| c.slot() < mark);
        }
        self.team_roots.retain(|r| r.slot() < mark);
    }

    fn make_inner_vars(&mut self, team: TeamIx, job: JobIx) -> Result<(), LatticeError> {
        let root = self.team_root(team)?;
        let j_var = self.allocate(VarCategory::JobTeam, VarMapping::job(team, job))?;
        self.attach(root, j_var)?;
        for k in 0..self.day_count {
            let d_var =
                self.allocate(VarCategory::JobTeamDay, VarMapping::day(team, job, DayIx(k)))?;
            self.attach(j_var, d_var)?;
        }
        Ok(())
    }

    fn attach(&mut self, parent: VarIx, child: VarIx) -> Result<(), LatticeError> {
        let len = self.vars.len();
        let parent = self
            .vars
            .get_mut(parent.slot())
            .ok_or(LatticeError::OutOfRange {
                kind: "variable",
                index: parent.get() as usize,
                len,
            })?;
        parent.children.push(child);
        Ok(())
    }

    fn team_root(&self, team: TeamIx) -> Result<VarIx, LatticeError> {
        self.team_roots
            .get(team.get())
            .copied()
            .ok_or(LatticeError::OutOfRange {
                kind: "team",
                index: team.get(),
                len: self.team_roots.len(),
            })
    }

    /// Looks up a variable by index.
    pub fn var(&self, ix: VarIx) -> Result<&CnfVar, LatticeError> {
        self.vars.get(ix.slot()).ok_or(LatticeError::OutOfRange {
            kind: "variable",
            index: ix.get() as usize,
            len: self.vars.len(),
        })
    }

    /// `T_i`.
    pub fn team_var(&self, team: TeamIx) -> Result<&CnfVar, LatticeError> {
        self.var(self.team_root(team)?)
    }

    /// `J_ij`, found through the team's child list.
    pub fn job_var(&self, team: TeamIx, job: JobIx) -> Result<&CnfVar, LatticeError> {
        let t_var = self.team_var(team)?;
        let ix = t_var
            .children
            .get(job.get())
            .copied()
            .ok_or(LatticeError::OutOfRange {
                kind: "job",
                index: job.get(),
                len: t_var.children.len(),
            })?;
        self.var(ix)
    }

    /// `D_ijk`, found through the job variable's child list.
    pub fn day_var(&self, team: TeamIx, job: JobIx, day: DayIx) -> Result<&CnfVar, LatticeError> {
        let j_var = self.job_var(team, job)?;
        let ix = j_var
            .children
            .get(day.get())
            .copied()
            .ok_or(LatticeError::OutOfRange {
                kind: "day",
                index: day.get(),
                len: j_var.children.len(),
            })?;
        self.var(ix)
    }

    /// Number of registered teams.
    pub fn team_count(&self) -> usize {
        self.team_roots.len()
    }

    /// Number of registered jobs.
    pub fn job_count(&self) -> usize {
        self.job_count
    }

    /// Number of days per job-team variable.
    pub fn day_count(&self) -> usize {
        self.day_count
    }

    /// Number of allocated variables (the largest index).
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Whether no variable has been allocated yet.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// All variables in index order.
    pub fn vars(&self) -> impl Iterator<Item = &CnfVar> {
        self.vars.iter()
    }

    /// Variables of one category, in index order.
    pub fn vars_of(&self, category: VarCategory) -> impl Iterator<Item = &CnfVar> {
        self.vars.iter().filter(move |v| v.category == category)
    }

    /// Verifies the whole lattice: contiguous indices, child counts,
    /// child categories and child mappings.
    pub fn check_complete(&self) -> Result<(), LatticeError> {
        for (slot, var) in self.vars.iter().enumerate() {
            if var.ix.slot() != slot {
                return Err(LatticeError::OutOfRange {
                    kind: "variable",
                    index: var.ix.get() as usize,
                    len: slot + 1,
                });
            }
        }

        for (t, &root) in self.team_roots.iter().enumerate() {
            let team = TeamIx(t);
            let t_var = self.expect_var(root, VarCategory::TeamActive, VarMapping::team(team))?;
            self.expect_children(t_var, self.job_count)?;

            for (j, &j_ix) in t_var.children.iter().enumerate() {
                let job = JobIx(j);
                let j_var = self.expect_var(j_ix, VarCategory::JobTeam, VarMapping::job(team, job))?;
                self.expect_children(j_var, self.day_count)?;

                for (k, &d_ix) in j_var.children.iter().enumerate() {
                    let d_var = self.expect_var(
                        d_ix,
                        VarCategory::JobTeamDay,
                        VarMapping::day(team, job, DayIx(k)),
                    )?;
                    self.expect_children(d_var, 0)?;
                }
            }
        }

        let expected = Self::expected_var_count(self.team_count(), self.job_count, self.day_count);
        if self.vars.len() != expected {
            return Err(LatticeError::ShapeMismatch {
                kind: "variables",
                lattice: self.vars.len(),
                entities: expected,
            });
        }
        Ok(())
    }

    fn expect_var(
        &self,
        ix: VarIx,
        category: VarCategory,
        mapping: VarMapping,
    ) -> Result<&CnfVar, LatticeError> {
        let var = self.var(ix)?;
        if var.category != category || var.mapping != mapping {
            return Err(LatticeError::Misplaced {
                var: ix,
                found: var.category,
                expected: category,
                mapping,
            });
        }
        Ok(var)
    }

    fn expect_children(&self, var: &CnfVar, expected: usize) -> Result<(), LatticeError> {
        if var.children.len() != expected {
            return Err(LatticeError::Incomplete {
                var: var.ix,
                category: var.category,
                actual: var.children.len(),
                expected,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_team_first_numbering() {
        let mut lattice = Lattice::new(2);
        lattice.register_team().unwrap();
        lattice.register_job().unwrap();

        // T0=1, J00=2, D000=3, D001=4
        let t = lattice.team_var(TeamIx(0)).unwrap();
        assert_eq!(t.ix.get(), 1);
        assert_eq!(t.category, VarCategory::TeamActive);
        let j = lattice.job_var(TeamIx(0), JobIx(0)).unwrap();
        assert_eq!(j.ix.get(), 2);
        let d = lattice.day_var(TeamIx(0), JobIx(0), DayIx(1)).unwrap();
        assert_eq!(d.ix.get(), 4);
        assert_eq!(d.mapping, VarMapping::day(TeamIx(0), JobIx(0), DayIx(1)));
        lattice.check_complete().unwrap();
    }

    #[test]
    fn test_jobs_first_materializes_on_team() {
        let mut lattice = Lattice::new(3);
        lattice.register_job().unwrap();
        lattice.register_job().unwrap();
        assert!(lattice.is_empty()); // No team yet, nothing to allocate

        lattice.register_team().unwrap();
        assert_eq!(lattice.var_count(), Lattice::expected_var_count(1, 2, 3));
        assert_eq!(lattice.team_var(TeamIx(0)).unwrap().children.len(), 2);
        lattice.check_complete().unwrap();
    }

    #[test]
    fn test_interleaved_registration() {
        let mut lattice = Lattice::new(1);
        lattice.register_team().unwrap(); // A
        lattice.register_job().unwrap(); // 1
        lattice.register_team().unwrap(); // B
        lattice.register_job().unwrap(); // 2

        lattice.check_complete().unwrap();
        for t in 0..2 {
            for j in 0..2 {
                let j_var = lattice.job_var(TeamIx(t), JobIx(j)).unwrap();
                assert_eq!(j_var.mapping, VarMapping::job(TeamIx(t), JobIx(j)));
                assert_eq!(j_var.children.len(), 1);
            }
        }
    }

    #[test]
    fn test_out_of_range_lookups() {
        let mut lattice = Lattice::new(1);
        lattice.register_team().unwrap();
        lattice.register_job().unwrap();

        assert!(matches!(
            lattice.team_var(TeamIx(1)),
            Err(LatticeError::OutOfRange { kind: "team", .. })
        ));
        assert!(matches!(
            lattice.job_var(TeamIx(0), JobIx(5)),
            Err(LatticeError::OutOfRange { kind: "job", .. })
        ));
        assert!(matches!(
            lattice.day_var(TeamIx(0), JobIx(0), DayIx(1)),
            Err(LatticeError::OutOfRange { kind: "day", .. })
        ));
        assert!(lattice.var(VarIx::new(99).unwrap()).is_err());
    }

    #[test]
    fn test_allocate_rejects_bad_mapping() {
        let mut lattice = Lattice::new(1);
        let err = lattice
            .allocate(VarCategory::TeamActive, VarMapping::job(TeamIx(0), JobIx(0)))
            .unwrap_err();
        assert!(matches!(err, LatticeError::MappingMismatch { .. }));
        assert!(lattice.is_empty());
    }

    #[test]
    fn test_detects_partial_lattice() {
        let mut lattice = Lattice::new(1);
        lattice.register_team().unwrap();
        // A job counted but never expanded for the existing team.
        lattice.job_count += 1;

        let err = lattice.check_complete().unwrap_err();
        assert!(matches!(
            err,
            LatticeError::Incomplete {
                category: VarCategory::TeamActive,
                actual: 0,
                expected: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_stray_variable_is_shape_mismatch() {
        let mut lattice = Lattice::new(1);
        lattice.register_team().unwrap();
        lattice
            .allocate(VarCategory::TeamActive, VarMapping::team(TeamIx(7)))
            .unwrap();

        let err = lattice.check_complete().unwrap_err();
        assert_eq!(
            err,
            LatticeError::ShapeMismatch {
                kind: "variables",
                lattice: 2,
                entities: 1,
            }
        );
    }

    #[test]
    fn test_failed_job_registration_leaves_lattice_unchanged() {
        // Two teams on two days: a new job needs 6 variables, only 4 fit.
        let mut lattice = Lattice::new(2).with_var_limit(6);
        lattice.register_team().unwrap();
        lattice.register_team().unwrap();
        assert_eq!(lattice.var_count(), 2);

        assert_eq!(lattice.register_job(), Err(LatticeError::Exhausted));
        assert_eq!(lattice.job_count(), 0);
        assert_eq!(lattice.var_count(), 2);
        assert!(lattice.team_var(TeamIx(0)).unwrap().children.is_empty());
        lattice.check_complete().unwrap();
    }

    #[test]
    fn test_failed_team_registration_leaves_lattice_unchanged() {
        let mut lattice = Lattice::new(1).with_var_limit(4);
        lattice.register_job().unwrap();
        lattice.register_team().unwrap(); // 3 variables

        assert_eq!(lattice.register_team(), Err(LatticeError::Exhausted));
        assert_eq!(lattice.team_count(), 1);
        assert_eq!(lattice.var_count(), 3);
        lattice.check_complete().unwrap();
    }

    #[test]
    fn test_category_tags() {
        assert_eq!(VarCategory::TeamActive.to_string(), "T");
        assert_eq!(VarCategory::JobTeam.to_string(), "J");
        assert_eq!(VarCategory::JobTeamDay.to_string(), "D");
        assert_eq!(
            VarMapping::day(TeamIx(1), JobIx(2), DayIx(3)).to_string(),
            "(team#1, job#2, day#3)"
        );
    }

    proptest! {
        /// Any interleaving of team/job registrations yields a complete
        /// lattice with a gap-free index range.
        #[test]
        fn prop_complete_under_any_order(
            order in proptest::collection::vec(any::<bool>(), 0..12),
            days in 0usize..4,
        ) {
            let mut lattice = Lattice::new(days);
            let (mut teams, mut jobs) = (0, 0);
            for is_team in order {
                if is_team {
                    lattice.register_team().unwrap();
                    teams += 1;
                } else {
                    lattice.register_job().unwrap();
                    jobs += 1;
                }
            }

            prop_assert!(lattice.check_complete().is_ok());
            prop_assert_eq!(lattice.var_count(), Lattice::expected_var_count(teams, jobs, days));

            let indices: HashSet<u32> = lattice.vars().map(|v| v.ix.get()).collect();
            prop_assert_eq!(indices.len(), lattice.var_count());
            for raw in 1..=lattice.var_count() as u32 {
                prop_assert!(indices.contains(&raw));
            }

            for t in 0..teams {
                for j in 0..jobs {
                    let j_var = lattice.job_var(TeamIx(t), JobIx(j)).unwrap();
                    prop_assert_eq!(j_var.children.len(), days);
                }
            }
        }
    }
}
