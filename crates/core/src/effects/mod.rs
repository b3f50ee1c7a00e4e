use std::collections::BTreeSet;

use crate::{Result, SongSyncError};

/// How to treat an `off` cue for an effect that was never switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffPolicy {
    /// Fail the run.
    #[default]
    Strict,
    /// Log a warning and carry on.
    Lenient,
}

/// Set of effects currently running on the printer.
///
/// Tracked so that an interrupted show can switch everything off again.
#[derive(Debug, Default, Clone)]
pub struct ActiveEffects {
    names: BTreeSet<String>,
    policy: OffPolicy,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: OffPolicy) -> Self {
        Self {
            names: BTreeSet::new(),
            policy,
        }
    }

    /// Records `name` as running. Activating a running effect is a no-op.
    pub fn activate(&mut self, name: &str) {
        if !self.names.insert(name.to_string()) {
            tracing::debug!(effect = name, "effect restarted while active");
        }
    }

    /// Forgets `name`. Under [`OffPolicy::Strict`] an unknown name is an
    /// error.
    pub fn deactivate(&mut self, name: &str) -> Result<()> {
        if self.names.remove(name) {
            return Ok(());
        }

        match self.policy {
            OffPolicy::Strict => Err(SongSyncError::InactiveEffect(name.to_string())),
            OffPolicy::Lenient => {
                tracing::warn!(effect = name, "stopping an effect that was not active");
                Ok(())
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Empties the set, returning the names in sorted order.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.names).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_then_off_leaves_set_empty() {
        let mut effects = ActiveEffects::new();
        effects.activate("a");
        assert!(effects.contains("a"));

        effects.deactivate("a").unwrap();
        assert!(effects.is_empty());
    }

    #[test]
    fn double_activation_is_tracked_once() {
        let mut effects = ActiveEffects::new();
        effects.activate("a");
        effects.activate("a");
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn strict_policy_rejects_unknown_effect() {
        let mut effects = ActiveEffects::new();
        let err = effects.deactivate("unknown").unwrap_err();
        assert!(matches!(err, SongSyncError::InactiveEffect(ref name) if name == "unknown"));
    }

    #[test]
    fn lenient_policy_ignores_unknown_effect() {
        let mut effects = ActiveEffects::with_policy(OffPolicy::Lenient);
        assert!(effects.deactivate("unknown").is_ok());
    }

    #[test]
    fn drain_returns_sorted_names() {
        let mut effects = ActiveEffects::new();
        effects.activate("rainbow");
        effects.activate("pulse");

        assert_eq!(effects.drain(), vec!["pulse".to_string(), "rainbow".to_string()]);
        assert!(effects.is_empty());
    }
}
