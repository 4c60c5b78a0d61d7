//! Capacity/overlap oracle.
//!
//! Decides whether two job-team-day facts can both hold: a team doing two
//! different jobs on the same day needs both durations plus the travel
//! between the two sites to fit into that day.

use crate::lattice::{DayIx, JobIx, VarMapping};
use crate::models::{Job, PayPeriod, TravelModel, WorkDay};

/// Pairwise capacity check over job-team-day mappings.
#[derive(Debug, Clone, Copy)]
pub struct OverlapOracle<'a> {
    jobs: &'a [Job],
    period: &'a PayPeriod,
    travel: &'a dyn TravelModel,
}

impl<'a> OverlapOracle<'a> {
    /// Creates an oracle over the scheduler's jobs, days and travel model.
    pub fn new(jobs: &'a [Job], period: &'a PayPeriod, travel: &'a dyn TravelModel) -> Self {
        Self {
            jobs,
            period,
            travel,
        }
    }

    /// Whether the two facts cannot both be true.
    ///
    /// Only same-team, same-day pairs of different jobs can overlap. Any
    /// other pair (or a mapping that is not a day fact) returns `false`.
    /// Symmetric in its arguments.
    pub fn overlaps(&self, a: &VarMapping, b: &VarMapping) -> bool {
        let (Some(job_a), Some(job_b), Some(day_a), Some(day_b)) = (a.job, b.job, a.day, b.day)
        else {
            return false;
        };
        if a.team != b.team || job_a == job_b || day_a != day_b {
            return false;
        }
        let (Some(ja), Some(jb), Some(day)) = (self.job(job_a), self.job(job_b), self.day(day_a))
        else {
            return false;
        };

        let load = u64::from(ja.duration_min) + u64::from(jb.duration_min) + self.travel_between(ja, jb);
        load > u64::from(day.capacity_min)
    }

    /// Whether a single job already exceeds the capacity of its day.
    pub fn exceeds_alone(&self, mapping: &VarMapping) -> bool {
        let (Some(job), Some(day)) = (mapping.job, mapping.day) else {
            return false;
        };
        match (self.job(job), self.day(day)) {
            (Some(job), Some(day)) => job.duration_min > day.capacity_min,
            _ => false,
        }
    }

    /// Total time (minutes) for one team doing `jobs` in the given order on
    /// one day: every duration plus the travel between consecutive sites.
    pub fn day_load(&self, jobs: &[JobIx]) -> u64 {
        let resolved: Vec<&Job> = jobs.iter().filter_map(|&j| self.job(j)).collect();
        let work: u64 = resolved.iter().map(|j| u64::from(j.duration_min)).sum();
        let travel: u64 = resolved
            .windows(2)
            .map(|pair| self.travel_between(pair[0], pair[1]))
            .sum();
        work + travel
    }

    // Symmetric even if the travel model is not.
    fn travel_between(&self, a: &Job, b: &Job) -> u64 {
        let there = self.travel.travel_minutes(a, b);
        let back = self.travel.travel_minutes(b, a);
        u64::from(there.max(back))
    }

    fn job(&self, ix: JobIx) -> Option<&'a Job> {
        self.jobs.get(ix.get())
    }

    fn day(&self, ix: DayIx) -> Option<&'a WorkDay> {
        self.period.get(ix.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::TeamIx;
    use crate::models::{FixedTravel, TravelMatrix};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn period(days: usize) -> PayPeriod {
        PayPeriod::consecutive(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), days, 8)
    }

    fn d(team: usize, job: usize, day: usize) -> VarMapping {
        VarMapping::day(TeamIx(team), JobIx(job), DayIx(day))
    }

    #[test]
    fn test_fits_with_zero_travel() {
        let jobs = vec![Job::new("A", 3), Job::new("B", 3)];
        let period = period(1);
        let travel = FixedTravel(0);
        let oracle = OverlapOracle::new(&jobs, &period, &travel);

        assert!(!oracle.overlaps(&d(0, 0, 0), &d(0, 1, 0)));
    }

    #[test]
    fn test_exceeds_capacity() {
        let jobs = vec![Job::new("A", 6), Job::new("B", 6)];
        let period = period(1);
        let travel = FixedTravel(0);
        let oracle = OverlapOracle::new(&jobs, &period, &travel);

        assert!(oracle.overlaps(&d(0, 0, 0), &d(0, 1, 0)));
    }

    #[test]
    fn test_travel_tips_the_balance() {
        // 4h + 4h = exactly 8h; any travel pushes it over.
        let jobs = vec![Job::new("A", 4), Job::new("B", 4)];
        let period = period(1);

        let no_travel = FixedTravel(0);
        let oracle = OverlapOracle::new(&jobs, &period, &no_travel);
        assert!(!oracle.overlaps(&d(0, 0, 0), &d(0, 1, 0)));

        let travel = FixedTravel::default();
        let oracle = OverlapOracle::new(&jobs, &period, &travel);
        assert!(oracle.overlaps(&d(0, 0, 0), &d(0, 1, 0)));
    }

    #[test]
    fn test_never_overlaps_across_team_day_or_same_job() {
        let jobs = vec![Job::new("A", 6), Job::new("B", 6)];
        let period = period(2);
        let travel = FixedTravel(0);
        let oracle = OverlapOracle::new(&jobs, &period, &travel);

        assert!(!oracle.overlaps(&d(0, 0, 0), &d(1, 1, 0))); // Different teams
        assert!(!oracle.overlaps(&d(0, 0, 0), &d(0, 1, 1))); // Different days
        assert!(!oracle.overlaps(&d(0, 0, 0), &d(0, 0, 0))); // Same job
        assert!(!oracle.overlaps(&VarMapping::team(TeamIx(0)), &d(0, 1, 0)));
    }

    #[test]
    fn test_out_of_range_never_overlaps() {
        let jobs = vec![Job::new("A", 6)];
        let period = period(1);
        let travel = FixedTravel(0);
        let oracle = OverlapOracle::new(&jobs, &period, &travel);

        assert!(!oracle.overlaps(&d(0, 0, 0), &d(0, 3, 0)));
        assert!(!oracle.exceeds_alone(&d(0, 0, 9)));
    }

    #[test]
    fn test_exceeds_alone() {
        let jobs = vec![Job::new("A", 9), Job::new("B", 8)];
        let period = period(1);
        let travel = FixedTravel(0);
        let oracle = OverlapOracle::new(&jobs, &period, &travel);

        assert!(oracle.exceeds_alone(&d(0, 0, 0)));
        assert!(!oracle.exceeds_alone(&d(0, 1, 0))); // Exactly fills the day
    }

    #[test]
    fn test_day_load() {
        let jobs = vec![Job::new("A", 2), Job::new("B", 3), Job::new("C", 1)];
        let period = period(1);
        let travel = TravelMatrix::new(30).with_route("A", "B", 15);
        let oracle = OverlapOracle::new(&jobs, &period, &travel);

        // 2h + 3h + 1h + (A→B 15) + (B→C 30)
        assert_eq!(oracle.day_load(&[JobIx(0), JobIx(1), JobIx(2)]), 360 + 45);
        assert_eq!(oracle.day_load(&[JobIx(1)]), 180);
        assert_eq!(oracle.day_load(&[]), 0);
    }

    proptest! {
        #[test]
        fn prop_overlap_symmetric(
            durations in proptest::collection::vec(0u32..600, 2..5),
            travel_min in 0u32..120,
            capacity_hours in 0u32..12,
            a in (0usize..2, 0usize..5, 0usize..2),
            b in (0usize..2, 0usize..5, 0usize..2),
        ) {
            let jobs: Vec<Job> = durations
                .iter()
                .enumerate()
                .map(|(i, &m)| Job::with_minutes(format!("site-{i}"), m))
                .collect();
            let period = PayPeriod::consecutive(
                NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                2,
                capacity_hours,
            );
            let travel = FixedTravel(travel_min);
            let oracle = OverlapOracle::new(&jobs, &period, &travel);

            let ma = d(a.0, a.1, a.2);
            let mb = d(b.0, b.1, b.2);
            prop_assert_eq!(oracle.overlaps(&ma, &mb), oracle.overlaps(&mb, &ma));
        }
    }
}
