// Keyresolve Layout Table
// Per-group table of key values, built by probing the host for every key and level

use strum::IntoEnumIterator;

use crate::case;
use crate::host::{GroupHandle, HostKeyProbe, ProbeResult, ProbeScope};
use crate::keyval::KeyValue;
use crate::level::ShiftLevel;
use crate::transform::deadkeys::{dead_keyval_for_spacing, DeadKeyNode};
use crate::vk::VK_COUNT;

/// One virtual key: its key value at each shift level
pub type KeyRow = [KeyValue; ShiftLevel::COUNT];

const VOID_ROW: KeyRow = [KeyValue::VOID; ShiftLevel::COUNT];

/// Resolved key values of one group, indexed by virtual key then shift level.
///
/// Every virtual key in `0..VK_COUNT` has a full row; keys the host could
/// not resolve hold `VOID`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutTable {
    rows: Vec<KeyRow>,
}

impl Default for LayoutTable {
    fn default() -> Self {
        Self {
            rows: vec![VOID_ROW; VK_COUNT],
        }
    }
}

/// Output of probing one group
#[derive(Debug, Clone)]
pub struct TableBuild {
    pub table: LayoutTable,
    /// Dead keys found while probing, without their combinations yet
    pub dead_keys: Vec<DeadKeyNode>,
}

impl LayoutTable {
    /// Key value at `(vk, level)`; out-of-range keys give `VOID`
    pub fn lookup(&self, vk: u32, level: ShiftLevel) -> KeyValue {
        self.row(vk)
            .map(|row| row[level.index()])
            .unwrap_or(KeyValue::VOID)
    }

    pub fn row(&self, vk: u32) -> Option<&KeyRow> {
        usize::try_from(vk).ok().and_then(|index| self.rows.get(index))
    }

    pub fn set(&mut self, vk: u32, level: ShiftLevel, keyval: KeyValue) {
        if let Some(row) = usize::try_from(vk).ok().and_then(|index| self.rows.get_mut(index)) {
            row[level.index()] = keyval;
        }
    }

    /// All rows as `(vk, row)` pairs in key order
    pub fn rows(&self) -> impl Iterator<Item = (u32, &KeyRow)> {
        self.rows.iter().enumerate().map(|(vk, row)| (vk as u32, row))
    }

    /// Whether any AltGr level types a different, non-`VOID` symbol than
    /// the same level without AltGr
    pub fn has_altgr(&self) -> bool {
        self.rows.iter().any(|row| {
            ShiftLevel::iter().any(|level| {
                let Some(plain) = level.altgr_counterpart() else {
                    return false;
                };
                let altgr = row[level.index()];
                !altgr.is_void() && altgr != row[plain.index()]
            })
        })
    }

    /// Probe every virtual key at every level.
    ///
    /// Keys without a scancode keep a `VOID` row and are not probed. Every
    /// dead key the host latches is reset before the next probe.
    pub fn build<P>(probe: &mut P, group: GroupHandle) -> TableBuild
    where
        P: HostKeyProbe + ?Sized,
    {
        let mut table = LayoutTable::default();
        let mut dead_keys = Vec::new();

        for vk in 0..VK_COUNT as u32 {
            let Some(scancode) = probe.scancode(group, vk) else {
                continue;
            };

            let mut row = VOID_ROW;
            {
                let mut scope = ProbeScope::new(probe, group);
                for level in ShiftLevel::iter() {
                    let result = scope.resolve(vk, scancode, level);
                    row[level.index()] = classify(vk, level, result, &mut dead_keys);
                    scope.reset();
                }
            }

            if let Some(named) = probe.named_keyval(vk) {
                row = [named; ShiftLevel::COUNT];
            }

            synthesize_shifted(&mut row);
            table.rows[vk as usize] = row;
        }

        log::trace!(
            "Probed group {:?}: {} dead keys",
            group,
            dead_keys.len()
        );
        TableBuild { table, dead_keys }
    }
}

/// Turn one probe result into a key value
fn classify(
    vk: u32,
    level: ShiftLevel,
    result: ProbeResult,
    dead_keys: &mut Vec<DeadKeyNode>,
) -> KeyValue {
    match result.count {
        0 => KeyValue::VOID,
        1 => KeyValue::from_codepoint(result.symbols[0]),
        -1 => {
            let spacing = result.symbols[0];
            let dead = dead_keyval_for_spacing(spacing);
            log::trace!("Dead key {} at vk {:#04x} level {}", dead, vk, level);
            dead_keys.push(DeadKeyNode::new(
                vk,
                level,
                KeyValue::from_codepoint(spacing),
                dead,
            ));
            dead
        }
        2 => match decode_surrogates(result.symbols) {
            Some(c) => KeyValue::from_unicode(c),
            None => {
                log::debug!(
                    "vk {:#04x} level {} types two symbols {:#x} {:#x}, ignoring",
                    vk,
                    level,
                    result.symbols[0],
                    result.symbols[1]
                );
                KeyValue::VOID
            }
        },
        count => {
            log::warn!(
                "Unexpected probe count {} for vk {:#04x} level {}",
                count,
                vk,
                level
            );
            KeyValue::VOID
        }
    }
}

/// A UTF-16 surrogate pair reported as two units
fn decode_surrogates(units: [u32; 2]) -> Option<char> {
    let high = u16::try_from(units[0]).ok()?;
    let low = u16::try_from(units[1]).ok()?;
    char::decode_utf16([high, low]).next()?.ok()
}

/// Fill in levels the host leaves empty but that have an obvious value
fn synthesize_shifted(row: &mut KeyRow) {
    for (plain, shifted) in [
        (ShiftLevel::None, ShiftLevel::Shift),
        (ShiftLevel::AltGr, ShiftLevel::ShiftAltGr),
    ] {
        let base = row[plain.index()];
        if base.is_void() || !row[shifted.index()].is_void() {
            continue;
        }
        let (lower, upper) = case::convert_case(base);
        if lower != upper {
            row[shifted.index()] = if base == lower { upper } else { lower };
        }
    }

    if row[ShiftLevel::None.index()] == KeyValue::TAB {
        row[ShiftLevel::Shift.index()] = KeyValue::ISO_LEFT_TAB;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{StaticGroup, StaticHost, StaticSymbol};
    use crate::vk;

    fn build(group: StaticGroup) -> TableBuild {
        let mut host = StaticHost::new(vec![group]);
        LayoutTable::build(&mut host, GroupHandle(0))
    }

    #[test]
    fn test_every_row_is_full() {
        let built = build(StaticGroup::new("us").with_chars(0x41, "aA"));
        assert_eq!(built.table.rows().count(), VK_COUNT);
        assert_eq!(built.table.lookup(0x41, ShiftLevel::Shift), KeyValue(0x41));
        assert_eq!(built.table.lookup(0x41, ShiftLevel::AltGr), KeyValue::VOID);
        assert_eq!(built.table.lookup(0x42, ShiftLevel::None), KeyValue::VOID);
    }

    #[test]
    fn test_out_of_range_lookup() {
        let built = build(StaticGroup::new("us"));
        assert_eq!(built.table.lookup(0x1000, ShiftLevel::None), KeyValue::VOID);
        assert!(built.table.row(256).is_none());
    }

    #[test]
    fn test_missing_scancode_gives_void_row() {
        let built = build(
            StaticGroup::new("us")
                .with_chars(0x41, "aA")
                .without_scancode(0x41),
        );
        assert_eq!(built.table.row(0x41), Some(&VOID_ROW));
    }

    #[test]
    fn test_shift_synthesized_from_case() {
        let built = build(StaticGroup::new("us").with_chars(0x41, "a"));
        assert_eq!(built.table.lookup(0x41, ShiftLevel::Shift), KeyValue(0x41));

        let built = build(StaticGroup::new("us").with_chars(0x31, "1"));
        assert_eq!(built.table.lookup(0x31, ShiftLevel::Shift), KeyValue::VOID);
    }

    #[test]
    fn test_tab_gets_iso_left_tab() {
        let built = build(StaticGroup::new("us").with_chars(vk::VK_TAB, "\t\t"));
        assert_eq!(built.table.lookup(vk::VK_TAB, ShiftLevel::None), KeyValue::TAB);
        assert_eq!(
            built.table.lookup(vk::VK_TAB, ShiftLevel::Shift),
            KeyValue::ISO_LEFT_TAB
        );
    }

    #[test]
    fn test_named_keys_override_probe() {
        let built = build(StaticGroup::new("us").with_chars(vk::VK_ESCAPE, "\u{1b}"));
        for level in ShiftLevel::iter() {
            assert_eq!(built.table.lookup(vk::VK_ESCAPE, level), KeyValue::ESCAPE);
        }
        assert_eq!(
            built.table.lookup(vk::VK_NUMPAD0 + 7, ShiftLevel::None),
            KeyValue(0xFFB7)
        );
    }

    #[test]
    fn test_dead_key_recorded_and_reset() {
        let mut host = StaticHost::new(vec![StaticGroup::new("de")
            .with_key(0xDD, &[StaticSymbol::Dead('\u{B4}'), StaticSymbol::Dead('`')])
            .with_chars(0x45, "eE")]);
        let built = LayoutTable::build(&mut host, GroupHandle(0));

        assert_eq!(built.table.lookup(0xDD, ShiftLevel::None), KeyValue::DEAD_ACUTE);
        assert_eq!(built.table.lookup(0xDD, ShiftLevel::Shift), KeyValue::DEAD_GRAVE);
        // the latch never leaks into the following key
        assert_eq!(built.table.lookup(0x45, ShiftLevel::None), KeyValue(0x65));
        assert_eq!(built.dead_keys.len(), 2);
        assert_eq!(built.dead_keys[0].base_keyval, KeyValue(0xB4));
        assert!(!host.is_latched());
        assert_eq!(host.reset_calls(), 2);
    }

    #[test]
    fn test_has_altgr() {
        let plain = build(StaticGroup::new("us").with_chars(0x45, "eE"));
        assert!(!plain.table.has_altgr());

        // AltGr repeating the plain symbol does not count
        let same = build(StaticGroup::new("x").with_chars(0x45, "eEeEe"));
        assert!(!same.table.has_altgr());

        let euro = build(StaticGroup::new("de").with_chars(0x45, "eEeE€"));
        assert!(euro.table.has_altgr());
    }

    #[test]
    fn test_surrogate_pair() {
        assert_eq!(decode_surrogates([0xD83D, 0xDE00]), Some('\u{1F600}'));
        assert_eq!(decode_surrogates([0x61, 0x62]), None);
    }

    #[test]
    fn test_unexpected_count_is_void() {
        let mut dead = Vec::new();
        let result = ProbeResult {
            symbols: [0x61, 0x62],
            count: 3,
        };
        assert_eq!(classify(0x41, ShiftLevel::None, result, &mut dead), KeyValue::VOID);
        assert!(dead.is_empty());
    }
}
