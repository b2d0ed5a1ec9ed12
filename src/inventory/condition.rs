// Condition registry - which actions a physical condition permits

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::types::{ActionKind, ConditionId};

/// Physical usability classification of equipment. Conditions are seeded,
/// admin-edited data; the engine only ever reads them.
///
/// A condition carries the set of action kinds it permits. An action may
/// execute against equipment only if the effective condition contains its
/// kind; a kind that is not in the set is simply not permitted, never an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub id: ConditionId,
    pub name: String,
    pub description: String,
    allowed: HashSet<ActionKind>,
}

impl Condition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        allowed: impl IntoIterator<Item = ActionKind>,
    ) -> Self {
        Self::with_id(ConditionId::new(), name, description, allowed)
    }

    /// Rebuild a condition from persisted data.
    pub fn with_id(
        id: ConditionId,
        name: impl Into<String>,
        description: impl Into<String>,
        allowed: impl IntoIterator<Item = ActionKind>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            allowed: allowed.into_iter().collect(),
        }
    }

    /// Does this condition permit the given action kind?
    pub fn permits(&self, kind: ActionKind) -> bool {
        self.allowed.contains(&kind)
    }

    pub fn allowed_actions(&self) -> impl Iterator<Item = ActionKind> + '_ {
        self.allowed.iter().copied()
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permits_is_pure_membership() {
        let condition = Condition::new(
            "Working",
            "Used but functional",
            [ActionKind::Deploy, ActionKind::Store],
        );

        assert!(condition.permits(ActionKind::Deploy));
        assert!(condition.permits(ActionKind::Store));
        assert!(!condition.permits(ActionKind::Transfer));
        assert!(!condition.permits(ActionKind::Decommission));
    }

    #[test]
    fn empty_condition_permits_nothing() {
        let condition = Condition::new("Decommissioned", "Beyond repair", []);

        for kind in ActionKind::ALL {
            assert!(!condition.permits(kind), "{kind} should not be permitted");
        }
    }
}
