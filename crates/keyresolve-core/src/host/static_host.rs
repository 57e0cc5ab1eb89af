// Keyresolve Static Host
// Table-driven host binding with the same dead-key latch behavior as a live host

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{GroupHandle, HostError, HostKeyProbe, LayoutChangeNotifier, LockState, ProbeResult};
use crate::level::ShiftLevel;
use crate::modifier::ModifierBinding;
use crate::vk;

/// What one key types at one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaticSymbol {
    /// Nothing
    #[default]
    Empty,
    /// A character
    Char(char),
    /// A dead key, carrying its spacing accent
    Dead(char),
}

/// One layout described by tables
#[derive(Debug, Clone, Default)]
pub struct StaticGroup {
    name: String,
    decimal_mark: Option<char>,
    keys: BTreeMap<u32, [StaticSymbol; ShiftLevel::COUNT]>,
    scancodes: BTreeMap<u32, u32>,
    missing_scancodes: BTreeSet<u32>,
    compose: HashMap<(char, char), char>,
}

impl StaticGroup {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the symbols of a key, in `ShiftLevel` order; missing levels are empty
    pub fn with_key(mut self, vk: u32, symbols: &[StaticSymbol]) -> Self {
        self.set_key(vk, symbols);
        self
    }

    pub fn set_key(&mut self, vk: u32, symbols: &[StaticSymbol]) {
        let mut row = [StaticSymbol::Empty; ShiftLevel::COUNT];
        for (slot, symbol) in row.iter_mut().zip(symbols) {
            *slot = *symbol;
        }
        self.keys.insert(vk, row);
    }

    /// Set one level of a key, leaving its other levels as they are
    pub fn set_level(&mut self, vk: u32, level: ShiftLevel, symbol: StaticSymbol) {
        let row = self
            .keys
            .entry(vk)
            .or_insert([StaticSymbol::Empty; ShiftLevel::COUNT]);
        row[level.index()] = symbol;
    }

    /// Shorthand for keys that only type characters: one char per level
    pub fn with_chars(self, vk: u32, chars: &str) -> Self {
        let symbols: Vec<StaticSymbol> = chars.chars().map(StaticSymbol::Char).collect();
        self.with_key(vk, &symbols)
    }

    /// `accent` followed by `base` types `result`
    pub fn with_compose(mut self, accent: char, base: char, result: char) -> Self {
        self.set_compose(accent, base, result);
        self
    }

    pub fn set_compose(&mut self, accent: char, base: char, result: char) {
        self.compose.insert((accent, base), result);
    }

    pub fn with_decimal_mark(mut self, mark: char) -> Self {
        self.decimal_mark = Some(mark);
        self
    }

    pub fn set_scancode(&mut self, vk: u32, scancode: u32) {
        self.scancodes.insert(vk, scancode);
    }

    /// Make the host report no scancode for `vk`
    pub fn without_scancode(mut self, vk: u32) -> Self {
        self.missing_scancodes.insert(vk);
        self
    }

    fn symbol(&self, vk: u32, level: ShiftLevel) -> StaticSymbol {
        self.keys
            .get(&vk)
            .map(|row| row[level.index()])
            .unwrap_or_default()
    }

    fn scancode(&self, vk: u32) -> Option<u32> {
        if vk == 0 || self.missing_scancodes.contains(&vk) {
            return None;
        }
        if let Some(&scancode) = self.scancodes.get(&vk) {
            return Some(scancode);
        }
        (self.keys.contains_key(&vk) || vk::named_keyval(vk).is_some()).then_some(vk)
    }
}

/// Host binding backed by `StaticGroup` tables.
///
/// Dead keys latch exactly like a live host: the next typed key either
/// combines (one symbol) or spills both the accent and itself (two
/// symbols), and a latch that is never consumed leaks into the next probe
/// until `reset_dead_state` is called.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    groups: Vec<StaticGroup>,
    active: usize,
    bindings: Vec<ModifierBinding>,
    locks: LockState,
    notifier: LayoutChangeNotifier,
    latch: Option<char>,
    resolve_calls: usize,
    reset_calls: usize,
}

impl StaticHost {
    pub fn new(groups: Vec<StaticGroup>) -> Self {
        Self {
            groups,
            ..Self::default()
        }
    }

    pub fn with_bindings(mut self, bindings: Vec<ModifierBinding>) -> Self {
        self.bindings = bindings;
        self
    }

    /// Handle through which layout changes are signalled
    pub fn notifier(&self) -> LayoutChangeNotifier {
        self.notifier.clone()
    }

    pub fn groups(&self) -> &[StaticGroup] {
        &self.groups
    }

    /// Swap in a new layout list and signal the change
    pub fn replace_groups(&mut self, groups: Vec<StaticGroup>) {
        self.groups = groups;
        self.active = self.active.min(self.groups.len().saturating_sub(1));
        self.latch = None;
        self.notifier.notify();
    }

    pub fn set_bindings(&mut self, bindings: Vec<ModifierBinding>) {
        self.bindings = bindings;
        self.notifier.notify();
    }

    /// Switch the active layout; out-of-range indices are ignored
    pub fn set_active(&mut self, index: usize) {
        if index < self.groups.len() {
            self.active = index;
        }
    }

    pub fn set_lock_state(&mut self, locks: LockState) {
        self.locks = locks;
    }

    pub fn handle_of(index: usize) -> GroupHandle {
        GroupHandle(index as u64)
    }

    pub fn is_latched(&self) -> bool {
        self.latch.is_some()
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls
    }

    pub fn reset_calls(&self) -> usize {
        self.reset_calls
    }

    fn group(&self, handle: GroupHandle) -> Option<&StaticGroup> {
        usize::try_from(handle.0)
            .ok()
            .and_then(|index| self.groups.get(index))
    }
}

impl HostKeyProbe for StaticHost {
    fn enumerate_groups(&mut self) -> Result<Vec<GroupHandle>, HostError> {
        Ok((0..self.groups.len()).map(Self::handle_of).collect())
    }

    fn scancode(&self, group: GroupHandle, vk: u32) -> Option<u32> {
        self.group(group)?.scancode(vk)
    }

    fn resolve(
        &mut self,
        group: GroupHandle,
        vk: u32,
        _scancode: u32,
        level: ShiftLevel,
    ) -> ProbeResult {
        self.resolve_calls += 1;
        let Some(layout) = self.group(group) else {
            return ProbeResult::none();
        };
        let symbol = layout.symbol(vk, level);

        match (self.latch, symbol) {
            (_, StaticSymbol::Empty) => ProbeResult::none(),
            (None, StaticSymbol::Char(c)) => ProbeResult::one(c as u32),
            (None, StaticSymbol::Dead(accent)) => {
                self.latch = Some(accent);
                ProbeResult::dead(accent as u32)
            }
            (Some(accent), StaticSymbol::Char(c)) => {
                let combined = layout.compose.get(&(accent, c)).copied();
                self.latch = None;
                match combined {
                    Some(result) => ProbeResult::one(result as u32),
                    None => ProbeResult::two(accent as u32, c as u32),
                }
            }
            (Some(accent), StaticSymbol::Dead(other)) => {
                self.latch = None;
                ProbeResult::two(accent as u32, other as u32)
            }
        }
    }

    fn reset_dead_state(&mut self, _group: GroupHandle) {
        self.reset_calls += 1;
        self.latch = None;
    }

    fn current_layout_serial(&self) -> u64 {
        self.notifier.serial()
    }

    fn active_group(&self) -> GroupHandle {
        Self::handle_of(self.active)
    }

    fn decimal_mark(&self, group: GroupHandle) -> char {
        self.group(group)
            .and_then(|layout| layout.decimal_mark)
            .unwrap_or('.')
    }

    fn modifier_bindings(&self) -> Vec<ModifierBinding> {
        self.bindings.clone()
    }

    fn lock_state(&self) -> LockState {
        self.locks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn german() -> StaticHost {
        StaticHost::new(vec![StaticGroup::new("de")
            .with_key(0xDD, &[StaticSymbol::Dead('\u{B4}'), StaticSymbol::Dead('`')])
            .with_chars(0x45, "eE")
            .with_chars(0x5A, "zZ")
            .with_compose('\u{B4}', 'e', 'é')
            .with_decimal_mark(',')])
    }

    #[test]
    fn test_plain_key() {
        let mut host = german();
        let result = host.resolve(GroupHandle(0), 0x45, 0x45, ShiftLevel::Shift);
        assert_eq!(result, ProbeResult::one('E' as u32));
        assert_eq!(host.resolve_calls(), 1);
    }

    #[test]
    fn test_dead_key_combines() {
        let mut host = german();
        let g = GroupHandle(0);
        assert!(host.resolve(g, 0xDD, 0xDD, ShiftLevel::None).is_dead());
        let result = host.resolve(g, 0x45, 0x45, ShiftLevel::None);
        assert_eq!(result, ProbeResult::one('é' as u32));
        assert!(!host.is_latched());
    }

    #[test]
    fn test_dead_key_spills_on_mismatch() {
        let mut host = german();
        let g = GroupHandle(0);
        host.resolve(g, 0xDD, 0xDD, ShiftLevel::None);
        let result = host.resolve(g, 0x5A, 0x5A, ShiftLevel::None);
        assert_eq!(result, ProbeResult::two(0xB4, 'z' as u32));
    }

    #[test]
    fn test_latch_leaks_without_reset() {
        let mut host = german();
        let g = GroupHandle(0);
        host.resolve(g, 0xDD, 0xDD, ShiftLevel::None);
        // an unrelated probe is polluted by the latch
        let polluted = host.resolve(g, 0x45, 0x45, ShiftLevel::None);
        assert_ne!(polluted, ProbeResult::one('e' as u32));

        host.resolve(g, 0xDD, 0xDD, ShiftLevel::None);
        host.reset_dead_state(g);
        assert_eq!(host.resolve(g, 0x45, 0x45, ShiftLevel::None), ProbeResult::one('e' as u32));
    }

    #[test]
    fn test_scancodes() {
        let host = StaticHost::new(vec![StaticGroup::new("x")
            .with_chars(0x41, "a")
            .without_scancode(0x42)
            .with_chars(0x42, "b")]);
        let g = GroupHandle(0);
        assert_eq!(host.scancode(g, 0x41), Some(0x41));
        assert_eq!(host.scancode(g, 0x42), None);
        assert_eq!(host.scancode(g, 0x43), None);
        assert_eq!(host.scancode(g, vk::VK_ESCAPE), Some(vk::VK_ESCAPE));
        assert_eq!(host.scancode(GroupHandle(9), 0x41), None);
    }

    #[test]
    fn test_replace_groups_bumps_serial() {
        let mut host = german();
        let before = host.current_layout_serial();
        host.replace_groups(vec![StaticGroup::new("us")]);
        assert_eq!(host.current_layout_serial(), before + 1);
        assert_eq!(host.decimal_mark(GroupHandle(0)), '.');
    }

    #[test]
    fn test_decimal_mark_and_active_group() {
        let mut host = german();
        assert_eq!(host.decimal_mark(GroupHandle(0)), ',');
        host.set_active(5);
        assert_eq!(host.active_group(), GroupHandle(0));
    }
}
