// Keyresolve Keymap Registry
//
// The registry owns the host probe and the built layouts. Every query first
// checks the host's layout serial and rebuilds the tables if it moved, so a
// layout change is always visible to the next lookup.

use strum::IntoEnumIterator;

use crate::host::{HostKeyProbe, LockState};
use crate::keyval::KeyValue;
use crate::layout::{Direction, Group, GroupOptions, LayoutTable};
use crate::level::ShiftLevel;
use crate::modifier::{ModifierIntent, ModifierMask};
use crate::settings::Settings;
use crate::transform::cache::LayoutCache;
use crate::transform::deadkeys::{ComposeOutput, Verdict};
use crate::transform::resolver::ModifierResolver;
use crate::vk::VK_COUNT;

/// Outcome of translating one key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub keyval: KeyValue,
    pub effective_group: usize,
    pub level: ShiftLevel,
    pub consumed_modifiers: ModifierMask,
}

/// A place on the keyboard that types a key value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeymapKey {
    pub vk: u32,
    pub group: usize,
    pub level: ShiftLevel,
}

/// What one key types in one group at one level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeycodeEntry {
    pub group: usize,
    pub level: ShiftLevel,
    pub keyval: KeyValue,
}

/// Owner of the host probe and every built layout
#[derive(Debug)]
pub struct KeymapRegistry<P: HostKeyProbe> {
    probe: P,
    cache: LayoutCache,
    settings: Settings,
}

impl<P: HostKeyProbe> KeymapRegistry<P> {
    /// Create a registry; tables are built on first use
    pub fn new(probe: P, settings: Settings) -> Self {
        Self {
            probe,
            cache: LayoutCache::new(),
            settings,
        }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Mutable access to the host; changes become visible after the host
    /// bumps its layout serial
    pub fn probe_mut(&mut self) -> &mut P {
        &mut self.probe
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Rebuild the tables if the host's layout serial moved.
    ///
    /// Returns whether a rebuild happened.
    pub fn refresh(&mut self) -> bool {
        self.cache.refresh(&mut self.probe)
    }

    /// Serial the current tables were built from
    pub fn serial(&self) -> Option<u64> {
        self.cache.built_serial()
    }

    pub fn group_count(&mut self) -> usize {
        self.refresh();
        self.cache.len()
    }

    pub fn group(&mut self, group: usize) -> Option<&Group> {
        self.refresh();
        self.cache.group(group)
    }

    pub fn table(&mut self, group: usize) -> Option<&LayoutTable> {
        self.group(group).map(Group::table)
    }

    /// Index of the host's active layout
    pub fn active_group(&mut self) -> Option<usize> {
        self.refresh();
        self.cache.index_of(self.probe.active_group())
    }

    pub fn lookup_key(&mut self, group: usize, vk: u32, level: ShiftLevel) -> KeyValue {
        self.table(group)
            .map(|table| table.lookup(vk, level))
            .unwrap_or(KeyValue::VOID)
    }

    /// Resolve a key event to a key value.
    ///
    /// Returns `None` for an unknown group or a key that types nothing in
    /// this state.
    pub fn translate_keyboard_state(
        &mut self,
        vk: u32,
        state: ModifierMask,
        group: usize,
    ) -> Option<Translation> {
        self.refresh();
        let ctrl_alt_is_altgr = self.settings.ctrl_alt_is_altgr();
        let layout = self.cache.group(group)?;
        let row = layout.table().row(vk)?;

        let resolver = ModifierResolver::new(layout.options(), ctrl_alt_is_altgr);
        let resolution = resolver.resolve(row, state);
        if resolution.keyval.is_void() {
            return None;
        }
        Some(Translation {
            keyval: resolution.keyval,
            effective_group: group,
            level: resolution.level,
            consumed_modifiers: resolution.consumed,
        })
    }

    /// Every `(vk, group, level)` that types `keyval`
    pub fn get_entries_for_keyval(&mut self, keyval: KeyValue) -> Vec<KeymapKey> {
        self.refresh();
        if keyval.is_void() {
            return Vec::new();
        }
        let groups = self.cache.groups();
        let mut entries = Vec::new();
        for vk in 0..VK_COUNT as u32 {
            for (index, group) in groups.iter().enumerate() {
                let Some(row) = group.table().row(vk) else {
                    continue;
                };
                entries.extend(
                    row.iter()
                        .zip(ShiftLevel::iter())
                        .filter(|(entry, _)| **entry == keyval)
                        .map(|(_, level)| KeymapKey {
                            vk,
                            group: index,
                            level,
                        }),
                );
            }
        }
        entries
    }

    /// Everything a virtual key types, across groups and levels
    pub fn get_entries_for_keycode(&mut self, vk: u32) -> Vec<KeycodeEntry> {
        self.refresh();
        let mut entries = Vec::new();
        for (index, group) in self.cache.groups().iter().enumerate() {
            let Some(row) = group.table().row(vk) else {
                continue;
            };
            entries.extend(
                row.iter()
                    .zip(ShiftLevel::iter())
                    .filter(|(entry, _)| !entry.is_void())
                    .map(|(entry, level)| KeycodeEntry {
                        group: index,
                        level,
                        keyval: *entry,
                    }),
            );
        }
        entries
    }

    /// Match a pending dead-key sequence against the active layout
    pub fn check_compose(&mut self, buffer: &[KeyValue]) -> (Verdict, ComposeOutput) {
        if !self.settings.compose_enabled() {
            return (Verdict::NoMatch, ComposeOutput::new());
        }
        let Some(active) = self.active_group() else {
            return (Verdict::NoMatch, ComposeOutput::new());
        };
        match self.cache.group(active) {
            Some(group) => group.dead_keys().check(buffer, group.table()),
            None => (Verdict::NoMatch, ComposeOutput::new()),
        }
    }

    /// Add Super/Hyper/Meta for the raw bits that back them
    pub fn add_virtual_modifiers(&mut self, state: ModifierMask) -> ModifierMask {
        self.refresh();
        self.cache.virtual_mods().add_virtual(state)
    }

    /// Add the raw bits backing Super/Hyper/Meta.
    ///
    /// The flag is `false` when two modifiers collapsed onto one raw bit.
    pub fn map_virtual_modifiers(&mut self, state: ModifierMask) -> (ModifierMask, bool) {
        self.refresh();
        self.cache.virtual_mods().map_virtual(state)
    }

    /// Modifier bits conventionally used for `intent` on this keyboard
    pub fn modifier_mask(&mut self, intent: ModifierIntent) -> ModifierMask {
        self.refresh();
        let mask = match intent {
            ModifierIntent::ShiftGroup
                if !self.cache.groups().iter().any(|g| g.options().has_altgr) =>
            {
                ModifierMask::empty()
            }
            _ => intent.mask(),
        };
        self.cache.virtual_mods().map_virtual(mask).0
    }

    pub fn direction(&mut self, group: usize) -> Option<Direction> {
        self.group(group).map(Group::direction)
    }

    /// Direction of the active layout, left-to-right when unknown
    pub fn active_direction(&mut self) -> Direction {
        self.active_group()
            .and_then(|group| self.direction(group))
            .unwrap_or(Direction::Ltr)
    }

    /// Whether layouts of both directions are installed
    pub fn have_bidi_layouts(&mut self) -> bool {
        self.refresh();
        let groups = self.cache.groups();
        let has = |direction: Direction| groups.iter().any(|g| g.direction() == direction);
        has(Direction::Ltr) && has(Direction::Rtl)
    }

    pub fn group_options(&mut self, group: usize) -> Option<GroupOptions> {
        self.group(group).map(Group::options)
    }

    /// Whether `scancode` is the right Shift key of `group`
    pub fn is_right_shift(&mut self, group: usize, scancode: u32) -> bool {
        self.group_options(group).is_some_and(|options| {
            options.right_shift_scancode != 0 && options.right_shift_scancode == scancode
        })
    }

    pub fn lock_state(&self) -> LockState {
        self.probe.lock_state()
    }

    pub fn caps_lock_state(&self) -> bool {
        self.lock_state().caps_lock
    }

    pub fn num_lock_state(&self) -> bool {
        self.lock_state().num_lock
    }

    pub fn scroll_lock_state(&self) -> bool {
        self.lock_state().scroll_lock
    }
}
