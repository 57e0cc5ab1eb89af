// Keyresolve Layout Cache
// Built groups plus the host serial they were built from; rebuilt wholesale on change

use crate::host::{GroupHandle, HostError, HostKeyProbe};
use crate::keyval::KeyValue;
use crate::layout::Group;
use crate::modifier::VirtualModifierMap;

/// Snapshot of every group, swapped in as a whole
#[derive(Debug, Clone, Default)]
pub struct LayoutCache {
    groups: Vec<Group>,
    virtual_mods: VirtualModifierMap,
    /// Serial the current groups were built from
    built_serial: Option<u64>,
    /// Serial of the last rebuild attempt, successful or not
    attempted_serial: Option<u64>,
}

impl LayoutCache {
    /// Create an empty cache; the first `refresh` builds it
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the host has moved past the last attempted serial
    pub fn is_stale(&self, current_serial: u64) -> bool {
        self.attempted_serial != Some(current_serial)
    }

    /// Rebuild if the host serial moved. Returns whether a rebuild succeeded.
    pub fn refresh<P>(&mut self, probe: &mut P) -> bool
    where
        P: HostKeyProbe + ?Sized,
    {
        let serial = probe.current_layout_serial();
        if !self.is_stale(serial) {
            return false;
        }
        match self.rebuild(probe) {
            Ok(()) => true,
            Err(e) => {
                log::warn!(
                    "Keeping {} previous layout(s), rebuild for serial {} failed: {}",
                    self.groups.len(),
                    serial,
                    e
                );
                false
            }
        }
    }

    /// Probe every group and replace the cached tables.
    ///
    /// On failure the previous tables stay in place.
    pub fn rebuild<P>(&mut self, probe: &mut P) -> Result<(), HostError>
    where
        P: HostKeyProbe + ?Sized,
    {
        let serial = probe.current_layout_serial();
        self.attempted_serial = Some(serial);
        log::debug!("Rebuilding keymap for layout serial {}", serial);

        let handles = probe.enumerate_groups()?;
        let mut groups = Vec::with_capacity(handles.len());
        for handle in handles {
            groups.push(Group::build(probe, handle));
        }

        let bindings = probe.modifier_bindings();
        let virtual_mods = VirtualModifierMap::detect(&bindings, |vk| keyvals_of(&groups, vk));

        self.groups = groups;
        self.virtual_mods = virtual_mods;
        self.built_serial = Some(serial);
        log::debug!(
            "Keymap built: {} group(s), serial {}",
            self.groups.len(),
            serial
        );
        Ok(())
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    /// Index of the group with this host handle
    pub fn index_of(&self, handle: GroupHandle) -> Option<usize> {
        self.groups.iter().position(|group| group.handle() == handle)
    }

    pub fn virtual_mods(&self) -> &VirtualModifierMap {
        &self.virtual_mods
    }

    pub fn built_serial(&self) -> Option<u64> {
        self.built_serial
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }
}

/// Every non-`VOID` key value a virtual key produces in any group
fn keyvals_of(groups: &[Group], vk: u32) -> Vec<KeyValue> {
    groups
        .iter()
        .filter_map(|group| group.table().row(vk))
        .flat_map(|row| row.iter().copied())
        .filter(|keyval| !keyval.is_void())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{StaticGroup, StaticHost};
    use crate::modifier::{ModifierBinding, ModifierMask};
    use crate::vk;

    /// Host that fails to enumerate on demand
    struct FlakyHost {
        inner: StaticHost,
        fail: bool,
    }

    impl HostKeyProbe for FlakyHost {
        fn enumerate_groups(&mut self) -> Result<Vec<GroupHandle>, HostError> {
            if self.fail {
                return Err(HostError::Unavailable);
            }
            self.inner.enumerate_groups()
        }

        fn scancode(&self, group: GroupHandle, vk: u32) -> Option<u32> {
            self.inner.scancode(group, vk)
        }

        fn resolve(
            &mut self,
            group: GroupHandle,
            vk: u32,
            scancode: u32,
            level: crate::level::ShiftLevel,
        ) -> crate::host::ProbeResult {
            self.inner.resolve(group, vk, scancode, level)
        }

        fn reset_dead_state(&mut self, group: GroupHandle) {
            self.inner.reset_dead_state(group)
        }

        fn current_layout_serial(&self) -> u64 {
            self.inner.current_layout_serial()
        }

        fn active_group(&self) -> GroupHandle {
            self.inner.active_group()
        }
    }

    #[test]
    fn test_refresh_only_when_serial_moves() {
        let mut host = StaticHost::new(vec![StaticGroup::new("us").with_chars(0x41, "aA")]);
        let mut cache = LayoutCache::new();
        assert!(cache.refresh(&mut host));
        assert_eq!(cache.len(), 1);
        assert!(!cache.refresh(&mut host));

        host.notifier().notify();
        assert!(cache.refresh(&mut host));
        assert_eq!(cache.built_serial(), Some(1));
    }

    #[test]
    fn test_failed_rebuild_keeps_tables() {
        let mut host = FlakyHost {
            inner: StaticHost::new(vec![StaticGroup::new("us").with_chars(0x41, "aA")]),
            fail: false,
        };
        let mut cache = LayoutCache::new();
        assert!(cache.refresh(&mut host));

        host.fail = true;
        host.inner.replace_groups(vec![]);
        assert!(!cache.refresh(&mut host));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.built_serial(), Some(0));
        // not retried until the serial moves again
        assert!(!cache.is_stale(host.current_layout_serial()));
    }

    #[test]
    fn test_virtual_modifiers_detected_on_rebuild() {
        let mut host = StaticHost::new(vec![StaticGroup::new("us")])
            .with_bindings(vec![ModifierBinding::new(6, vec![vk::VK_LWIN, vk::VK_RWIN])]);
        let mut cache = LayoutCache::new();
        cache.refresh(&mut host);
        assert_eq!(cache.virtual_mods().virtual_for_bit(6), ModifierMask::SUPER);
    }

    #[test]
    fn test_index_of() {
        let mut host = StaticHost::new(vec![StaticGroup::new("us"), StaticGroup::new("de")]);
        let mut cache = LayoutCache::new();
        cache.refresh(&mut host);
        assert_eq!(cache.index_of(GroupHandle(1)), Some(1));
        assert_eq!(cache.index_of(GroupHandle(7)), None);
    }
}
