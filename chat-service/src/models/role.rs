//! Audience roles used to scope curated answers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Audience a curated answer table is written for.
///
/// `Student`, `Teacher`, `Parent` and `General` form the closed set the
/// role-aware deployment classifies into. `Default` is the single implicit
/// scope used when role classification is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Default,
    Student,
    Teacher,
    Parent,
    General,
}

impl Role {
    /// Roles a caller may name or the classifier may produce.
    pub const AUDIENCES: [Role; 4] = [Role::Student, Role::Teacher, Role::Parent, Role::General];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Default => "default",
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Parent => "parent",
            Role::General => "general",
        }
    }

    /// How the role is described to the text-generation backend.
    pub fn asker(&self) -> &'static str {
        match self {
            Role::Default | Role::General => "a portal visitor",
            Role::Student => "a student",
            Role::Teacher => "a teacher or staff member",
            Role::Parent => "a parent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    /// Parses one of the four audience roles, ignoring case and surrounding
    /// whitespace. `default` is internal and not accepted here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Role::AUDIENCES
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or(UnknownRole(normalized))
    }
}

/// Effective audience for one request.
///
/// A caller may name a role outside the known set; such a request has no
/// curated table and always goes to the text-generation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    Known(Role),
    Unrecognized(String),
}

impl Audience {
    /// Interpret a caller-supplied role label.
    pub fn from_label(label: &str) -> Self {
        match label.parse::<Role>() {
            Ok(role) => Audience::Known(role),
            Err(UnknownRole(normalized)) => Audience::Unrecognized(normalized),
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Audience::Known(role) => Some(*role),
            Audience::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Audience::Known(role) => role.as_str(),
            Audience::Unrecognized(label) => label,
        }
    }

    /// Bounded label for metrics. Caller-chosen text never becomes a series.
    pub fn metrics_label(&self) -> &'static str {
        match self {
            Audience::Known(role) => role.as_str(),
            Audience::Unrecognized(_) => "unknown",
        }
    }
}

impl From<Role> for Audience {
    fn from(role: Role) -> Self {
        Audience::Known(role)
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
