//! Team and employee models.
//!
//! A team is the unit that performs jobs. Its identity is its name; the
//! roster is informational (it does not enter the encoding) but is
//! carried through to the decoded schedule for display.

use serde::{Deserialize, Serialize};

/// A single crew member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Display name.
    pub name: String,
}

impl Employee {
    /// Creates an employee.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A team of employees that is scheduled as one unit.
///
/// Each team owns its roster; rosters are never shared across instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Unique team name (identity).
    pub name: String,
    /// Crew members.
    pub members: Vec<Employee>,
}

impl Team {
    /// Creates a team with an empty roster.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Creates a team from a name and an initial roster.
    pub fn with_members<I>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = Employee>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().collect(),
        }
    }

    /// Adds a member (builder style).
    pub fn with_member(mut self, member: Employee) -> Self {
        self.members.push(member);
        self
    }

    /// Adds a member.
    pub fn add_member(&mut self, member: Employee) {
        self.members.push(member);
    }

    /// Number of crew members.
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Whether the team has nobody on its roster.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
