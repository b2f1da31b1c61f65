//! Keyword-based audience classification.

use crate::models::Role;

/// Keyword rules in priority order; the first role with a matching keyword wins.
const DEFAULT_RULES: &[(Role, &[&str])] = &[
    (
        Role::Student,
        &[
            "admission",
            "exam",
            "student login",
            "course",
            "library",
            "timetable",
        ],
    ),
    (
        Role::Teacher,
        &[
            "faculty",
            "teacher",
            "staff login",
            "circular",
            "announcement",
            "fdp",
        ],
    ),
    (
        Role::Parent,
        &[
            "parent",
            "track student",
            "performance",
            "contact faculty",
            "hostel",
        ],
    ),
];

/// Maps a message to an audience role by case-insensitive substring match.
///
/// Messages that match no rule classify as [`Role::General`].
#[derive(Debug, Clone)]
pub struct RoleClassifier {
    rules: Vec<(Role, Vec<String>)>,
}

impl Default for RoleClassifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_RULES
                .iter()
                .map(|(role, keywords)| (*role, keywords.iter().map(|k| k.to_string()).collect())),
        )
    }
}

impl RoleClassifier {
    /// Build a classifier from rules given in priority order.
    pub fn new(rules: impl IntoIterator<Item = (Role, Vec<String>)>) -> Self {
        let rules = rules
            .into_iter()
            .map(|(role, keywords)| {
                let keywords = keywords
                    .into_iter()
                    .map(|k| k.to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (role, keywords)
            })
            .collect();
        Self { rules }
    }

    pub fn classify(&self, message: &str) -> Role {
        let lowered = message.to_lowercase();
        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k.as_str())))
            .map(|(role, _)| *role)
            .unwrap_or(Role::General)
    }
}
