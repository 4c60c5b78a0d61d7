//! Job model and travel-time lookup.
//!
//! A job is a location-bound unit of work with a fixed duration. Jobs
//! done back to back by the same team on the same day also pay the
//! travel time between their locations.
//!
//! # Time Representation
//! Durations and travel times are whole minutes. Constructors accept
//! hours for convenience.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;

/// Minutes in one hour.
pub const MINUTES_PER_HOUR: u32 = 60;

/// Travel time charged between two distinct jobs when nothing better is known.
pub const DEFAULT_TRAVEL_MINUTES: u32 = 30;

/// A job to be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Location label (identity).
    pub address: String,
    /// On-site duration (minutes).
    pub duration_min: u32,
}

impl Job {
    /// Creates a job lasting `duration_hours` at `address`. The duration
    /// saturates at `u32::MAX` minutes.
    pub fn new(address: impl Into<String>, duration_hours: u32) -> Self {
        Self {
            address: address.into(),
            duration_min: duration_hours.saturating_mul(MINUTES_PER_HOUR),
        }
    }

    /// Creates a job with a duration given in minutes.
    pub fn with_minutes(address: impl Into<String>, duration_min: u32) -> Self {
        Self {
            address: address.into(),
            duration_min,
        }
    }

    /// Duration in fractional hours.
    pub fn duration_hours(&self) -> f64 {
        f64::from(self.duration_min) / f64::from(MINUTES_PER_HOUR)
    }
}

/// Travel time between two job locations.
///
/// Implementations must be symmetric (`a → b` costs the same as `b → a`)
/// and must return 0 for a job paired with itself.
pub trait TravelModel: Send + Sync + Debug {
    /// Travel minutes between two jobs.
    fn travel_minutes(&self, from: &Job, to: &Job) -> u32;
}

/// Every pair of distinct locations costs the same fixed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTravel(pub u32);

impl Default for FixedTravel {
    fn default() -> Self {
        Self(DEFAULT_TRAVEL_MINUTES)
    }
}

impl TravelModel for FixedTravel {
    fn travel_minutes(&self, from: &Job, to: &Job) -> u32 {
        if from.address == to.address {
            0
        } else {
            self.0
        }
    }
}

/// Explicit travel times between location pairs.
///
/// Routes are stored under the unordered address pair, so lookups are
/// symmetric regardless of insertion direction. Pairs without an explicit
/// route fall back to `default_min`.
#[derive(Debug, Clone, Default)]
pub struct TravelMatrix {
    routes: HashMap<(String, String), u32>,
    /// Travel time for pairs with no explicit route.
    pub default_min: u32,
}

impl TravelMatrix {
    /// Creates an empty matrix with the given fallback time.
    pub fn new(default_min: u32) -> Self {
        Self {
            routes: HashMap::new(),
            default_min,
        }
    }

    /// Defines (or overwrites) the travel time between two locations.
    pub fn set_route(&mut self, a: impl Into<String>, b: impl Into<String>, minutes: u32) {
        self.routes.insert(route_key(a.into(), b.into()), minutes);
    }

    /// Builder: defines a route and returns self.
    pub fn with_route(mut self, a: impl Into<String>, b: impl Into<String>, minutes: u32) -> Self {
        self.set_route(a, b, minutes);
        self
    }

    /// Travel minutes between two locations.
    pub fn get(&self, a: &str, b: &str) -> u32 {
        if a == b {
            return 0;
        }
        let key = route_key(a.to_string(), b.to_string());
        self.routes.get(&key).copied().unwrap_or(self.default_min)
    }

    /// Number of explicitly defined routes.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }
}

impl TravelModel for TravelMatrix {
    fn travel_minutes(&self, from: &Job, to: &Job) -> u32 {
        self.get(&from.address, &to.address)
    }
}

fn route_key(a: String, b: String) -> (String, String) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_hours() {
        let job = Job::new("1 LMU Drive", 3);
        assert_eq!(job.duration_min, 180);
        assert!((job.duration_hours() - 3.0).abs() < 1e-10);

        let short = Job::with_minutes("1062 Durness", 90);
        assert!((short.duration_hours() - 1.5).abs() < 1e-10);
    }

    #[test]
    fn test_job_hours_saturate() {
        let job = Job::new("Q", u32::MAX / MINUTES_PER_HOUR + 1);
        assert_eq!(job.duration_min, u32::MAX);
    }

    #[test]
    fn test_fixed_travel() {
        let a = Job::new("A", 1);
        let b = Job::new("B", 1);
        let travel = FixedTravel::default();

        assert_eq!(travel.travel_minutes(&a, &b), DEFAULT_TRAVEL_MINUTES);
        assert_eq!(travel.travel_minutes(&b, &a), DEFAULT_TRAVEL_MINUTES);
        assert_eq!(travel.travel_minutes(&a, &a), 0);
        assert_eq!(FixedTravel(0).travel_minutes(&a, &b), 0);
    }

    #[test]
    fn test_travel_matrix_symmetric() {
        let matrix = TravelMatrix::new(45)
            .with_route("A", "B", 10)
            .with_route("C", "A", 20);

        assert_eq!(matrix.get("A", "B"), 10);
        assert_eq!(matrix.get("B", "A"), 10);
        assert_eq!(matrix.get("A", "C"), 20);
        assert_eq!(matrix.get("B", "C"), 45); // Falls to default
        assert_eq!(matrix.get("B", "B"), 0);
        assert_eq!(matrix.route_count(), 2);
    }

    #[test]
    fn test_travel_matrix_overwrite_either_direction() {
        let mut matrix = TravelMatrix::new(0).with_route("A", "B", 10);
        matrix.set_route("B", "A", 25);

        assert_eq!(matrix.get("A", "B"), 25);
        assert_eq!(matrix.route_count(), 1);
    }
}
