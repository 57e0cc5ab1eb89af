// Keyresolve Modifier System
// Modifier bitmask, intents and the Super/Hyper/Meta virtual-modifier mapping

use std::fmt;

use strum_macros::{Display, EnumIter};

use crate::keyval::KeyValue;

bitflags::bitflags! {
    /// Modifier state as delivered with a key event.
    ///
    /// Bits 0-7 are the eight raw host modifiers. The lock and AltGr bits are
    /// named host states; Super/Hyper/Meta are virtual and only ever backed
    /// by one of the spare raw bits `MOD2..=MOD5`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierMask: u32 {
        const SHIFT    = 1 << 0;
        const LOCK     = 1 << 1;
        const CONTROL  = 1 << 2;
        const ALT      = 1 << 3;
        const MOD2     = 1 << 4;
        const MOD3     = 1 << 5;
        const MOD4     = 1 << 6;
        const MOD5     = 1 << 7;
        const NUM_LOCK = 1 << 8;
        const ALT_GR   = 1 << 9;
        const SUPER    = 1 << 26;
        const HYPER    = 1 << 27;
        const META     = 1 << 28;
    }
}

impl ModifierMask {
    /// Raw bits that may alias a virtual modifier
    pub const SPARE: ModifierMask = ModifierMask::MOD2
        .union(ModifierMask::MOD3)
        .union(ModifierMask::MOD4)
        .union(ModifierMask::MOD5);

    pub const VIRTUAL: ModifierMask = ModifierMask::SUPER
        .union(ModifierMask::HYPER)
        .union(ModifierMask::META);

    /// Parse a comma/plus separated list such as `shift,lock` or `Ctrl+Alt`
    pub fn parse_list(list: &str) -> Result<Self, String> {
        list.split([',', '+'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .try_fold(ModifierMask::empty(), |mask, part| {
                let bit = match part.to_lowercase().as_str() {
                    "shift" => ModifierMask::SHIFT,
                    "lock" | "caps" | "capslock" => ModifierMask::LOCK,
                    "control" | "ctrl" => ModifierMask::CONTROL,
                    "alt" | "mod1" => ModifierMask::ALT,
                    "mod2" => ModifierMask::MOD2,
                    "mod3" => ModifierMask::MOD3,
                    "mod4" => ModifierMask::MOD4,
                    "mod5" => ModifierMask::MOD5,
                    "numlock" | "num_lock" => ModifierMask::NUM_LOCK,
                    "altgr" | "alt_gr" => ModifierMask::ALT_GR,
                    "super" => ModifierMask::SUPER,
                    "hyper" => ModifierMask::HYPER,
                    "meta" => ModifierMask::META,
                    other => return Err(format!("unknown modifier '{}'", other)),
                };
                Ok(mask | bit)
            })
    }
}

impl fmt::Display for ModifierMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<&str> = self.iter_names().map(|(name, _)| name).collect();
        write!(f, "{}", names.join("+"))
    }
}

/// What a modifier is used for, independent of which bits back it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum ModifierIntent {
    PrimaryAccelerator,
    ContextMenu,
    ExtendSelection,
    ModifySelection,
    NoTextInput,
    ShiftGroup,
    DefaultModMask,
}

impl ModifierIntent {
    /// Modifier bits conventionally used for this intent
    pub fn mask(self) -> ModifierMask {
        match self {
            ModifierIntent::PrimaryAccelerator => ModifierMask::CONTROL,
            ModifierIntent::ContextMenu => ModifierMask::empty(),
            ModifierIntent::ExtendSelection => ModifierMask::SHIFT,
            ModifierIntent::ModifySelection => ModifierMask::CONTROL,
            ModifierIntent::NoTextInput => {
                ModifierMask::ALT | ModifierMask::CONTROL | ModifierMask::VIRTUAL
            }
            ModifierIntent::ShiftGroup => ModifierMask::ALT_GR,
            ModifierIntent::DefaultModMask => {
                ModifierMask::SHIFT
                    | ModifierMask::CONTROL
                    | ModifierMask::ALT
                    | ModifierMask::VIRTUAL
            }
        }
    }
}

/// Raw modifier bit and the virtual keys the host binds to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierBinding {
    /// Raw bit index, 0-7
    pub bit: u8,
    pub vks: Vec<u32>,
}

impl ModifierBinding {
    pub fn new(bit: u8, vks: Vec<u32>) -> Self {
        Self { bit, vks }
    }
}

/// Which virtual modifiers each spare raw bit (`MOD2..=MOD5`) carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VirtualModifierMap {
    sets: [ModifierMask; 4],
}

impl VirtualModifierMap {
    const FIRST_SPARE_BIT: u8 = 4;

    /// Scan the host's modifier bindings for keys that produce Super, Hyper or Meta.
    ///
    /// `keyvals_of` yields every key value a virtual key produces in the
    /// current tables (all groups, all levels).
    pub fn detect<I>(bindings: &[ModifierBinding], keyvals_of: impl Fn(u32) -> I) -> Self
    where
        I: IntoIterator<Item = KeyValue>,
    {
        let mut map = Self::default();
        for binding in bindings {
            let Some(slot) = Self::slot_of(binding.bit) else {
                continue;
            };
            for &vk in &binding.vks {
                for keyval in keyvals_of(vk) {
                    map.sets[slot] |= virtual_for_keyval(keyval);
                }
            }
        }
        map
    }

    /// Build directly from per-slot sets (slot 0 is `MOD2`)
    pub fn from_sets(sets: [ModifierMask; 4]) -> Self {
        Self {
            sets: sets.map(|set| set & ModifierMask::VIRTUAL),
        }
    }

    fn slot_of(bit: u8) -> Option<usize> {
        (Self::FIRST_SPARE_BIT..Self::FIRST_SPARE_BIT + 4)
            .contains(&bit)
            .then(|| usize::from(bit - Self::FIRST_SPARE_BIT))
    }

    fn raw_bit(slot: usize) -> ModifierMask {
        ModifierMask::from_bits_truncate(1 << (usize::from(Self::FIRST_SPARE_BIT) + slot))
    }

    /// Virtual modifiers carried by a spare raw bit
    pub fn virtual_for_bit(&self, bit: u8) -> ModifierMask {
        Self::slot_of(bit)
            .map(|slot| self.sets[slot])
            .unwrap_or_else(ModifierMask::empty)
    }

    /// Add Super/Hyper/Meta wherever any raw bit backing them is set.
    pub fn add_virtual(&self, state: ModifierMask) -> ModifierMask {
        self.sets
            .iter()
            .enumerate()
            .filter(|(slot, _)| state.contains(Self::raw_bit(*slot)))
            .fold(state, |acc, (_, set)| acc | *set)
    }

    /// Add the raw bits backing each virtual modifier present in `state`.
    ///
    /// Returns `false` as the second element when a raw bit was already set
    /// before being added, meaning two modifiers collapsed onto one bit.
    pub fn map_virtual(&self, state: ModifierMask) -> (ModifierMask, bool) {
        let mut mapped = state;
        let mut independent = true;
        for virtual_mod in [ModifierMask::SUPER, ModifierMask::HYPER, ModifierMask::META] {
            if !state.contains(virtual_mod) {
                continue;
            }
            for (slot, set) in self.sets.iter().enumerate() {
                if !set.contains(virtual_mod) {
                    continue;
                }
                let raw = Self::raw_bit(slot);
                if mapped.contains(raw) {
                    independent = false;
                }
                mapped |= raw;
            }
        }
        (mapped, independent)
    }
}

fn virtual_for_keyval(keyval: KeyValue) -> ModifierMask {
    match keyval {
        KeyValue::SUPER_L | KeyValue::SUPER_R => ModifierMask::SUPER,
        KeyValue::HYPER_L | KeyValue::HYPER_R => ModifierMask::HYPER,
        KeyValue::META_L | KeyValue::META_R => ModifierMask::META,
        _ => ModifierMask::empty(),
    }
}
