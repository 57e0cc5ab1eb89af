// Keyresolve Probe Scope
// Guarantees the host's dead-key latch is cleared on every exit path

use super::{GroupHandle, HostKeyProbe, ProbeResult};
use crate::level::ShiftLevel;

/// Borrow of a host probe for one layout.
///
/// Any dead key latched through this scope is reset when the scope is
/// dropped, including on early returns.
pub struct ProbeScope<'a, P: HostKeyProbe + ?Sized> {
    probe: &'a mut P,
    group: GroupHandle,
    latched: bool,
}

impl<'a, P: HostKeyProbe + ?Sized> ProbeScope<'a, P> {
    pub fn new(probe: &'a mut P, group: GroupHandle) -> Self {
        Self {
            probe,
            group,
            latched: false,
        }
    }

    pub fn group(&self) -> GroupHandle {
        self.group
    }

    pub fn resolve(&mut self, vk: u32, scancode: u32, level: ShiftLevel) -> ProbeResult {
        let result = self.probe.resolve(self.group, vk, scancode, level);
        if result.is_dead() {
            self.latched = true;
        }
        result
    }

    /// Clear the latch now rather than at drop
    pub fn reset(&mut self) {
        if self.latched {
            self.probe.reset_dead_state(self.group);
            self.latched = false;
        }
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }
}

impl<P: HostKeyProbe + ?Sized> Drop for ProbeScope<'_, P> {
    fn drop(&mut self) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{StaticGroup, StaticHost, StaticSymbol};

    fn host_with_dead_key() -> StaticHost {
        StaticHost::new(vec![StaticGroup::new("test")
            .with_key(0xDE, &[StaticSymbol::Dead('\u{B4}')])
            .with_key(0x41, &[StaticSymbol::Char('a')])])
    }

    #[test]
    fn test_scope_resets_after_dead_key() {
        let mut host = host_with_dead_key();
        let group = GroupHandle(0);
        {
            let mut scope = ProbeScope::new(&mut host, group);
            assert!(scope.resolve(0xDE, 0xDE, ShiftLevel::None).is_dead());
            assert!(scope.is_latched());
        }
        assert_eq!(host.reset_calls(), 1);
        assert!(!host.is_latched());
        // the next key types on its own
        let result = host.resolve(group, 0x41, 0x41, ShiftLevel::None);
        assert_eq!(result, ProbeResult::one('a' as u32));
    }

    #[test]
    fn test_scope_without_dead_key_does_not_reset() {
        let mut host = host_with_dead_key();
        {
            let mut scope = ProbeScope::new(&mut host, GroupHandle(0));
            scope.resolve(0x41, 0x41, ShiftLevel::None);
        }
        assert_eq!(host.reset_calls(), 0);
    }

    #[test]
    fn test_explicit_reset_is_not_repeated_on_drop() {
        let mut host = host_with_dead_key();
        {
            let mut scope = ProbeScope::new(&mut host, GroupHandle(0));
            scope.resolve(0xDE, 0xDE, ShiftLevel::None);
            scope.reset();
        }
        assert_eq!(host.reset_calls(), 1);
    }
}
