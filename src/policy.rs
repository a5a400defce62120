use std::collections::BTreeSet;

use crate::config::GameOptions;
use crate::model::ActionKind;
use crate::task::TaskConstraints;

/// Why an action kind is excluded for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Forbidden,
    NotAllowed,
    StrictActionsOnly,
}

impl Rejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Rejection::Forbidden => "forbidden by task constraints",
            Rejection::NotAllowed => "not in the allowed action types",
            Rejection::StrictActionsOnly => "freeform effects disabled by game options",
        }
    }
}

/// Task constraints and game options resolved against the catalog.
///
/// Forbidden always wins over allowed and suggested.
#[derive(Debug, Clone, Default)]
pub struct ActionPolicy {
    /// Set when the caller gave any allowed names, even unrecognized ones.
    restricted: bool,
    allowed: BTreeSet<ActionKind>,
    forbidden: BTreeSet<ActionKind>,
    suggested: Vec<ActionKind>,
    strict_actions_only: bool,
}

impl ActionPolicy {
    pub fn new(constraints: &TaskConstraints, options: &GameOptions) -> Self {
        let allowed = resolve(&constraints.allowed_action_types, "allowed")
            .into_iter()
            .collect();
        let forbidden = resolve(&constraints.forbidden_action_types, "forbidden")
            .into_iter()
            .collect();
        let mut suggested = Vec::new();
        for kind in resolve(&constraints.suggested_action_types, "suggested") {
            if !suggested.contains(&kind) {
                suggested.push(kind);
            }
        }
        Self {
            restricted: !constraints.allowed_action_types.is_empty(),
            allowed,
            forbidden,
            suggested,
            strict_actions_only: options.strict_actions_only,
        }
    }

    pub fn check(&self, kind: ActionKind) -> Result<(), Rejection> {
        if self.forbidden.contains(&kind) {
            return Err(Rejection::Forbidden);
        }
        if self.restricted && !self.allowed.contains(&kind) {
            return Err(Rejection::NotAllowed);
        }
        if self.strict_actions_only && kind == ActionKind::FreeformEffect {
            return Err(Rejection::StrictActionsOnly);
        }
        Ok(())
    }

    pub fn permits(&self, kind: ActionKind) -> bool {
        self.check(kind).is_ok()
    }

    pub fn is_forbidden(&self, kind: ActionKind) -> bool {
        self.forbidden.contains(&kind)
    }

    /// True when the caller supplied an allow-list.
    pub fn is_restricted(&self) -> bool {
        self.restricted
    }

    /// The recognized allow-list entries, in catalog order.
    pub fn allowed(&self) -> Vec<ActionKind> {
        self.allowed.iter().copied().collect()
    }

    pub fn forbidden(&self) -> Vec<ActionKind> {
        self.forbidden.iter().copied().collect()
    }

    /// Suggested kinds in the caller's order, including ones policy rejects.
    pub fn suggested(&self) -> &[ActionKind] {
        &self.suggested
    }

    /// Every catalog kind this policy admits, in catalog order.
    pub fn permitted_kinds(&self) -> Vec<ActionKind> {
        ActionKind::ALL
            .iter()
            .copied()
            .filter(|k| self.permits(*k))
            .collect()
    }
}

fn resolve(names: &[String], list: &str) -> Vec<ActionKind> {
    names
        .iter()
        .filter_map(|name| {
            let kind = ActionKind::from_loose(name);
            if kind.is_none() {
                tracing::warn!("ignoring unknown {list} action type {name:?}");
            }
            kind
        })
        .collect()
}
