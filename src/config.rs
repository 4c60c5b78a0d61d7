//! Problem files.
//!
//! A problem file is TOML describing the pay period, travel times, teams
//! and jobs. Loading it yields a ready-to-resolve [`SatScheduler`].
//!
//! # Examples
//!
//! ```
//! use u_sat_schedule::config::ProblemConfig;
//!
//! let config = ProblemConfig::from_toml_str(r#"
//!     [pay_period]
//!     start_date = "2024-03-04"
//!     length_days = 2
//!
//!     [[teams]]
//!     name = "A"
//!     members = ["Luis", "Leo"]
//!
//!     [[jobs]]
//!     address = "1 LMU Drive"
//!     duration_hours = 3
//! "#).unwrap();
//!
//! let scheduler = config.build_scheduler().unwrap();
//! assert_eq!(scheduler.period().len(), 2);
//! assert_eq!(scheduler.teams().len(), 1);
//! ```

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    Employee, FixedTravel, Job, PayPeriod, Team, TravelMatrix, DEFAULT_TRAVEL_MINUTES,
};
use crate::scheduler::{SatScheduler, DEFAULT_PERIOD_DAYS, DEFAULT_WORKDAY_HOURS};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// A complete scheduling problem.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProblemConfig {
    /// Pay period generation.
    #[serde(default)]
    pub pay_period: PayPeriodConfig,

    /// Travel times between job locations.
    #[serde(default)]
    pub travel: TravelConfig,

    /// Teams, in registration order.
    #[serde(default)]
    pub teams: Vec<TeamConfig>,

    /// Jobs, in registration order.
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
}

/// Pay period generation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PayPeriodConfig {
    /// First day. Today (local) if absent.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    /// Number of work days.
    #[serde(default = "default_length_days")]
    pub length_days: usize,

    /// Capacity of every work day, in hours.
    #[serde(default = "default_workday_hours")]
    pub workday_hours: u32,

    /// Skip Saturdays and Sundays.
    #[serde(default)]
    pub skip_weekends: bool,
}

impl Default for PayPeriodConfig {
    fn default() -> Self {
        Self {
            start_date: None,
            length_days: DEFAULT_PERIOD_DAYS,
            workday_hours: DEFAULT_WORKDAY_HOURS,
            skip_weekends: false,
        }
    }
}

fn default_length_days() -> usize {
    DEFAULT_PERIOD_DAYS
}

fn default_workday_hours() -> u32 {
    DEFAULT_WORKDAY_HOURS
}

/// Travel times.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TravelConfig {
    /// Minutes between any two distinct locations without a route.
    #[serde(default = "default_travel_minutes")]
    pub default_minutes: u32,

    /// Explicit routes (symmetric).
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            default_minutes: DEFAULT_TRAVEL_MINUTES,
            routes: Vec::new(),
        }
    }
}

fn default_travel_minutes() -> u32 {
    DEFAULT_TRAVEL_MINUTES
}

/// A travel route between two job addresses.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    pub from: String,
    pub to: String,
    pub minutes: u32,
}

/// A team and its members.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TeamConfig {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

/// A job.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobConfig {
    pub address: String,
    pub duration_hours: u32,
}

impl ProblemConfig {
    /// Loads a problem from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses a problem from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Generates the pay period.
    pub fn build_period(&self) -> PayPeriod {
        let p = &self.pay_period;
        let start = p
            .start_date
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        if p.skip_weekends {
            PayPeriod::weekdays(start, p.length_days, p.workday_hours)
        } else {
            PayPeriod::consecutive(start, p.length_days, p.workday_hours)
        }
    }

    /// Builds a scheduler with every team and job registered.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for routes naming unknown or
    /// identical addresses, or if registration fails.
    pub fn build_scheduler(&self) -> Result<SatScheduler, ConfigError> {
        let mut scheduler = SatScheduler::new(self.build_period());

        if self.travel.routes.is_empty() {
            scheduler = scheduler.with_travel(FixedTravel(self.travel.default_minutes));
        } else {
            scheduler = scheduler.with_travel(self.travel_matrix()?);
        }

        for team in &self.teams {
            scheduler
                .add_team(Team::with_members(
                    team.name.clone(),
                    team.members.iter().map(|m| Employee::new(m.clone())),
                ))
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        for job in &self.jobs {
            scheduler
                .add_job(Job::new(job.address.clone(), job.duration_hours))
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        Ok(scheduler)
    }

    fn travel_matrix(&self) -> Result<TravelMatrix, ConfigError> {
        let addresses: HashSet<&str> = self.jobs.iter().map(|j| j.address.as_str()).collect();
        let mut matrix = TravelMatrix::new(self.travel.default_minutes);
        for route in &self.travel.routes {
            for end in [&route.from, &route.to] {
                if !addresses.contains(end.as_str()) {
                    return Err(ConfigError::Invalid(format!(
                        "route references unknown job address '{end}'"
                    )));
                }
            }
            if route.from == route.to {
                return Err(ConfigError::Invalid(format!(
                    "route from '{}' to itself",
                    route.from
                )));
            }
            matrix.set_route(route.from.clone(), route.to.clone(), route.minutes);
        }
        Ok(matrix)
    }
}
