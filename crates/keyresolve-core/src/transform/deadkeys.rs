// Keyresolve Dead Keys
// Dead-key index of a group and the two-key compose check over it

use smallvec::{smallvec, SmallVec};
use strum::IntoEnumIterator;
use strum_macros::Display;

use crate::case;
use crate::host::{GroupHandle, HostKeyProbe, ProbeResult, ProbeScope};
use crate::keyval::KeyValue;
use crate::layout::LayoutTable;
use crate::level::ShiftLevel;
use crate::vk::VK_COUNT;

/// Output of a compose check: at most two key values
pub type ComposeOutput = SmallVec<[KeyValue; 2]>;

/// A key that, typed after a dead key, yields `result_keyval`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboEntry {
    pub vk: u32,
    pub level: ShiftLevel,
    pub result_keyval: KeyValue,
}

/// One dead key of a group and the combinations it accepts.
///
/// Chaining stops at two keys: children are plain combinations, never
/// further dead keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadKeyNode {
    pub vk: u32,
    pub level: ShiftLevel,
    /// Spacing form of the accent
    pub base_keyval: KeyValue,
    pub dead_keyval: KeyValue,
    pub children: Vec<ComboEntry>,
}

impl DeadKeyNode {
    pub fn new(vk: u32, level: ShiftLevel, base_keyval: KeyValue, dead_keyval: KeyValue) -> Self {
        Self {
            vk,
            level,
            base_keyval,
            dead_keyval,
            children: Vec::new(),
        }
    }
}

/// Outcome of matching a pending key sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Verdict {
    /// The sequence does not start with a dead key
    #[strum(serialize = "none")]
    NoMatch,
    /// A dead key waiting for the next key
    #[strum(serialize = "incomplete")]
    Incomplete,
    /// Dead key and following key compose to one symbol
    #[strum(serialize = "exact")]
    Exact,
    /// No composition; the accent and the key are emitted separately
    #[strum(serialize = "partial")]
    Partial,
}

impl Verdict {
    /// Whether the pending sequence is finished
    pub fn is_terminal(self) -> bool {
        self != Verdict::Incomplete
    }
}

/// Dead keys of one group, sorted by `(dead_keyval, level)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeadKeyIndex {
    nodes: Vec<DeadKeyNode>,
}

impl DeadKeyIndex {
    /// Index already-populated nodes
    pub fn from_nodes(mut nodes: Vec<DeadKeyNode>) -> Self {
        nodes.sort_by_key(|node| (node.dead_keyval, node.level));
        Self { nodes }
    }

    /// Find the combinations of every dead key by typing it followed by
    /// each producing key of the table.
    ///
    /// Shifted entries the table synthesized by case conversion compose
    /// through their unshifted level, with the result case-converted the
    /// same way.
    pub fn build<P>(
        probe: &mut P,
        group: GroupHandle,
        table: &LayoutTable,
        mut nodes: Vec<DeadKeyNode>,
    ) -> Self
    where
        P: HostKeyProbe + ?Sized,
    {
        for node in &mut nodes {
            let Some(dead_scancode) = probe.scancode(group, node.vk) else {
                continue;
            };
            let dead = (node.vk, dead_scancode, node.level);
            for vk in 0..VK_COUNT as u32 {
                let Some(scancode) = probe.scancode(group, vk) else {
                    continue;
                };
                for level in ShiftLevel::iter() {
                    let typed = table.lookup(vk, level);
                    if typed.is_void() || typed.is_dead() {
                        continue;
                    }
                    let result = match compose_after(probe, group, dead, (vk, scancode, level)) {
                        Some(result) if result.count == 1 => {
                            Some(KeyValue::from_codepoint(result.symbols[0]))
                        }
                        // the host types nothing here; the table entry was synthesized
                        Some(result) if result.count == 0 => {
                            synthesized_from(table, vk, level).and_then(|plain| {
                                let composed =
                                    compose_after(probe, group, dead, (vk, scancode, plain))
                                        .filter(|composed| composed.count == 1)?;
                                let composed = KeyValue::from_codepoint(composed.symbols[0]);
                                let (lower, upper) = case::convert_case(composed);
                                (lower != upper)
                                    .then_some(if case::is_upper(typed) { upper } else { lower })
                            })
                        }
                        _ => None,
                    };
                    if let Some(result_keyval) = result {
                        node.children.push(ComboEntry {
                            vk,
                            level,
                            result_keyval,
                        });
                    }
                }
            }
            log::trace!(
                "Dead key {} has {} combinations",
                node.dead_keyval,
                node.children.len()
            );
        }
        Self::from_nodes(nodes)
    }

    pub fn nodes(&self) -> &[DeadKeyNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// First node of the run with this dead key value
    pub fn find(&self, dead_keyval: KeyValue) -> Option<&DeadKeyNode> {
        let start = self
            .nodes
            .partition_point(|node| node.dead_keyval < dead_keyval);
        self.nodes
            .get(start)
            .filter(|node| node.dead_keyval == dead_keyval)
    }

    /// Match a pending sequence against this index.
    ///
    /// `active` is the table of the active group, used to tell which key
    /// typed `buffer[1]`. Only the first two values are considered.
    pub fn check(&self, buffer: &[KeyValue], active: &LayoutTable) -> (Verdict, ComposeOutput) {
        let Some(&first) = buffer.first() else {
            return (Verdict::NoMatch, ComposeOutput::new());
        };
        let Some(node) = self.find(first) else {
            return (Verdict::NoMatch, ComposeOutput::new());
        };
        let Some(&second) = buffer.get(1) else {
            return (Verdict::Incomplete, ComposeOutput::new());
        };

        if let Some(combo) = node
            .children
            .iter()
            .find(|combo| active.lookup(combo.vk, combo.level) == second)
        {
            return (Verdict::Exact, smallvec![combo.result_keyval]);
        }

        let literal = if second.is_dead() {
            self.find(second)
                .map(|other| other.base_keyval)
                .or_else(|| spacing_for_dead(second))
                .unwrap_or(second)
        } else {
            second
        };
        (Verdict::Partial, smallvec![node.base_keyval, literal])
    }
}

/// Type `dead` then `key`, each given as `(vk, scancode, level)`, and
/// return what the key produced; `None` when `dead` does not latch
fn compose_after<P>(
    probe: &mut P,
    group: GroupHandle,
    dead: (u32, u32, ShiftLevel),
    key: (u32, u32, ShiftLevel),
) -> Option<ProbeResult>
where
    P: HostKeyProbe + ?Sized,
{
    let mut scope = ProbeScope::new(probe, group);
    if !scope.resolve(dead.0, dead.1, dead.2).is_dead() {
        return None;
    }
    Some(scope.resolve(key.0, key.1, key.2))
}

/// Unshifted level a Shift or Shift+AltGr entry was case-converted from
fn synthesized_from(table: &LayoutTable, vk: u32, level: ShiftLevel) -> Option<ShiftLevel> {
    if !matches!(level, ShiftLevel::Shift | ShiftLevel::ShiftAltGr) {
        return None;
    }
    let plain = level.without(ShiftLevel::SHIFT_BIT);
    let base = table.lookup(vk, plain);
    let (lower, upper) = case::convert_case(base);
    let flipped = if base == lower { upper } else { lower };
    (lower != upper && flipped == table.lookup(vk, level)).then_some(plain)
}

/// Spacing accents and the dead keys they stand for.
///
/// The first entry of each dead key is its canonical spacing form. Combining
/// marks come last; layouts built on them report those instead.
const DEAD_SPACING: &[(u32, KeyValue)] = &[
    (0x60, KeyValue::DEAD_GRAVE),
    (0xB4, KeyValue::DEAD_ACUTE),
    (0x27, KeyValue::DEAD_ACUTE),
    (0x384, KeyValue::DEAD_ACUTE),
    (0x5E, KeyValue::DEAD_CIRCUMFLEX),
    (0x2C6, KeyValue::DEAD_CIRCUMFLEX),
    (0x7E, KeyValue::DEAD_TILDE),
    (0x2DC, KeyValue::DEAD_TILDE),
    (0xAF, KeyValue::DEAD_MACRON),
    (0x2D8, KeyValue::DEAD_BREVE),
    (0x2D9, KeyValue::DEAD_ABOVEDOT),
    (0xB7, KeyValue::DEAD_ABOVEDOT),
    (0xA8, KeyValue::DEAD_DIAERESIS),
    (0x22, KeyValue::DEAD_DIAERESIS),
    (0xB0, KeyValue::DEAD_ABOVERING),
    (0x2DA, KeyValue::DEAD_ABOVERING),
    (0x2DD, KeyValue::DEAD_DOUBLEACUTE),
    (0x2C7, KeyValue::DEAD_CARON),
    (0xB8, KeyValue::DEAD_CEDILLA),
    (0x2DB, KeyValue::DEAD_OGONEK),
    (0x37A, KeyValue::DEAD_IOTA),
    (0x300, KeyValue::DEAD_GRAVE),
    (0x301, KeyValue::DEAD_ACUTE),
    (0x302, KeyValue::DEAD_CIRCUMFLEX),
    (0x303, KeyValue::DEAD_TILDE),
    (0x304, KeyValue::DEAD_MACRON),
    (0x306, KeyValue::DEAD_BREVE),
    (0x307, KeyValue::DEAD_ABOVEDOT),
    (0x308, KeyValue::DEAD_DIAERESIS),
    (0x309, KeyValue::DEAD_HOOK),
    (0x30A, KeyValue::DEAD_ABOVERING),
    (0x30B, KeyValue::DEAD_DOUBLEACUTE),
    (0x30C, KeyValue::DEAD_CARON),
    (0x323, KeyValue::DEAD_BELOWDOT),
    (0x327, KeyValue::DEAD_CEDILLA),
    (0x328, KeyValue::DEAD_OGONEK),
    (0x345, KeyValue::DEAD_IOTA),
];

/// Dead key value for the spacing character a host reports for a dead key.
///
/// Characters with no dead counterpart keep their own key value.
pub fn dead_keyval_for_spacing(spacing: u32) -> KeyValue {
    DEAD_SPACING
        .iter()
        .find(|(cp, _)| *cp == spacing)
        .map(|(_, dead)| *dead)
        .unwrap_or_else(|| KeyValue::from_codepoint(spacing))
}

/// Canonical spacing form of a dead key value
pub fn spacing_for_dead(dead: KeyValue) -> Option<KeyValue> {
    DEAD_SPACING
        .iter()
        .find(|(_, d)| *d == dead)
        .map(|(cp, _)| KeyValue::from_codepoint(*cp))
}
