// Keyresolve Groups
// One keyboard layout: its table, dead keys, options and text direction

use std::cell::OnceCell;

use strum_macros::Display;
use unicode_bidi::{bidi_class, BidiClass};

use crate::host::{GroupHandle, HostKeyProbe};
use crate::layout::table::LayoutTable;
use crate::transform::deadkeys::DeadKeyIndex;
use crate::vk::VK_RSHIFT;

/// Per-group flags, fixed when the group is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupOptions {
    pub has_altgr: bool,
    pub decimal_mark: char,
    /// Scancode of the right Shift key, 0 if the host has none
    pub right_shift_scancode: u32,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            has_altgr: false,
            decimal_mark: '.',
            right_shift_scancode: 0,
        }
    }
}

/// Dominant writing direction of a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Direction {
    #[strum(serialize = "ltr")]
    Ltr,
    #[strum(serialize = "rtl")]
    Rtl,
}

/// One keyboard layout as seen by the keymap
#[derive(Debug, Clone)]
pub struct Group {
    handle: GroupHandle,
    table: LayoutTable,
    dead_keys: DeadKeyIndex,
    options: GroupOptions,
    direction: OnceCell<Direction>,
}

impl Group {
    /// Probe the host for one layout: table first, then dead-key combinations
    pub fn build<P>(probe: &mut P, handle: GroupHandle) -> Self
    where
        P: HostKeyProbe + ?Sized,
    {
        let built = LayoutTable::build(probe, handle);
        let dead_keys = DeadKeyIndex::build(probe, handle, &built.table, built.dead_keys);
        let options = GroupOptions {
            has_altgr: built.table.has_altgr(),
            decimal_mark: probe.decimal_mark(handle),
            right_shift_scancode: probe.scancode(handle, VK_RSHIFT).unwrap_or(0),
        };

        Self::from_parts(handle, built.table, dead_keys, options)
    }

    pub fn from_parts(
        handle: GroupHandle,
        table: LayoutTable,
        dead_keys: DeadKeyIndex,
        options: GroupOptions,
    ) -> Self {
        Self {
            handle,
            table,
            dead_keys,
            options,
            direction: OnceCell::new(),
        }
    }

    pub fn handle(&self) -> GroupHandle {
        self.handle
    }

    pub fn table(&self) -> &LayoutTable {
        &self.table
    }

    pub fn dead_keys(&self) -> &DeadKeyIndex {
        &self.dead_keys
    }

    pub fn options(&self) -> GroupOptions {
        self.options
    }

    /// Computed on first use
    pub fn direction(&self) -> Direction {
        *self.direction.get_or_init(|| direction_of(&self.table))
    }
}

/// Right-to-left when strong RTL symbols outnumber strong LTR ones
fn direction_of(table: &LayoutTable) -> Direction {
    let (mut ltr, mut rtl) = (0usize, 0usize);
    for (_, row) in table.rows() {
        for c in row.iter().filter_map(|keyval| keyval.to_unicode()) {
            match bidi_class(c) {
                BidiClass::L => ltr += 1,
                BidiClass::R | BidiClass::AL => rtl += 1,
                _ => {}
            }
        }
    }
    if rtl > ltr {
        Direction::Rtl
    } else {
        Direction::Ltr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{StaticGroup, StaticHost};

    fn build(group: StaticGroup) -> Group {
        let mut host = StaticHost::new(vec![group]);
        Group::build(&mut host, GroupHandle(0))
    }

    #[test]
    fn test_options() {
        let group = build(
            StaticGroup::new("de")
                .with_chars(0x45, "eEeE€")
                .with_decimal_mark(','),
        );
        let options = group.options();
        assert!(options.has_altgr);
        assert_eq!(options.decimal_mark, ',');
        assert_eq!(options.right_shift_scancode, VK_RSHIFT);
    }

    #[test]
    fn test_direction() {
        let latin = build(StaticGroup::new("us").with_chars(0x41, "aA").with_chars(0x42, "bB"));
        assert_eq!(latin.direction(), Direction::Ltr);

        let hebrew = build(
            StaticGroup::new("il")
                .with_chars(0x41, "ש")
                .with_chars(0x42, "נ")
                .with_chars(0x43, "ב")
                .with_chars(0x44, "dD"),
        );
        assert_eq!(hebrew.direction(), Direction::Rtl);
    }

    #[test]
    fn test_direction_of_empty_layout() {
        assert_eq!(build(StaticGroup::new("none")).direction(), Direction::Ltr);
    }
}
