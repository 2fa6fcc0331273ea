//! Switch-hook debouncer
//!
//! Two-sample filter: a new position is accepted once two consecutive raw
//! samples agree and differ from the debounced position. A single-tick
//! glitch can therefore never register.

use crate::types::HookState;

/// Two-sample hook debouncer
#[derive(Clone, Copy, Debug, Default)]
pub struct HookDebouncer {
    previous_raw: bool,
    debounced: HookState,
}

impl HookDebouncer {
    /// Create a debouncer resting on-hook
    #[must_use]
    pub const fn new() -> Self {
        Self {
            previous_raw: false,
            debounced: HookState::OnHook,
        }
    }

    /// Feed one raw sample (`true` = loop closed); returns the new position
    /// when a debounced transition registers
    pub fn sample(&mut self, raw_off_hook: bool) -> Option<HookState> {
        let stable = raw_off_hook == self.previous_raw;
        self.previous_raw = raw_off_hook;

        let candidate = HookState::from_off_hook(raw_off_hook);
        if stable && candidate != self.debounced {
            self.debounced = candidate;
            Some(candidate)
        } else {
            None
        }
    }

    /// Debounced position
    #[must_use]
    pub const fn state(&self) -> HookState {
        self.debounced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_glitch_ignored() {
        let mut hook = HookDebouncer::new();
        for raw in [false, false, true, false, false] {
            assert_eq!(hook.sample(raw), None);
        }
        assert_eq!(hook.state(), HookState::OnHook);
    }

    #[test]
    fn two_stable_samples_register() {
        let mut hook = HookDebouncer::new();
        assert_eq!(hook.sample(true), None);
        assert_eq!(hook.sample(true), Some(HookState::OffHook));
        assert_eq!(hook.sample(true), None);
        assert_eq!(hook.sample(false), None);
        assert_eq!(hook.sample(false), Some(HookState::OnHook));
    }
}
