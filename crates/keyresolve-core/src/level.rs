// Keyresolve Shift Levels
// The eight canonical Shift/CapsLock/AltGr combinations

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Which of the eight canonical modifier combinations is active.
///
/// The discriminant is the bit pattern: bit 0 Shift, bit 1 CapsLock,
/// bit 2 AltGr. Ordering follows the bit pattern.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum ShiftLevel {
    #[strum(serialize = "none")]
    None = 0,
    #[strum(serialize = "shift")]
    Shift = 1,
    #[strum(serialize = "capslock")]
    CapsLock = 2,
    #[strum(serialize = "shift+capslock")]
    ShiftCapsLock = 3,
    #[strum(serialize = "altgr")]
    AltGr = 4,
    #[strum(serialize = "shift+altgr")]
    ShiftAltGr = 5,
    #[strum(serialize = "capslock+altgr")]
    CapsLockAltGr = 6,
    #[strum(serialize = "shift+capslock+altgr")]
    ShiftCapsLockAltGr = 7,
}

impl ShiftLevel {
    /// Number of levels per key
    pub const COUNT: usize = 8;

    pub const SHIFT_BIT: u8 = 0b001;
    pub const CAPS_BIT: u8 = 0b010;
    pub const ALTGR_BIT: u8 = 0b100;

    /// Build a level from its bit pattern; only the low three bits are valid.
    pub fn from_bits(bits: u8) -> Option<Self> {
        Self::iter().find(|level| level.bits() == bits)
    }

    pub fn from_flags(shift: bool, caps: bool, altgr: bool) -> Self {
        let bits = u8::from(shift) * Self::SHIFT_BIT
            | u8::from(caps) * Self::CAPS_BIT
            | u8::from(altgr) * Self::ALTGR_BIT;
        Self::from_bits(bits).unwrap_or(ShiftLevel::None)
    }

    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Position of this level inside a table row
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn has_shift(self) -> bool {
        self.bits() & Self::SHIFT_BIT != 0
    }

    pub fn has_caps_lock(self) -> bool {
        self.bits() & Self::CAPS_BIT != 0
    }

    pub fn has_altgr(self) -> bool {
        self.bits() & Self::ALTGR_BIT != 0
    }

    /// Flip the given level bits
    pub fn toggled(self, bits: u8) -> Self {
        Self::from_bits((self.bits() ^ bits) & 0b111).unwrap_or(self)
    }

    /// Drop the given level bits
    pub fn without(self, bits: u8) -> Self {
        Self::from_bits(self.bits() & !bits).unwrap_or(self)
    }

    /// Proper sub-levels of this level, highest bit pattern first.
    ///
    /// This is the order in which a `VOID` entry falls back: for
    /// Shift+CapsLock+AltGr it yields CapsLock+AltGr, Shift+AltGr, AltGr,
    /// Shift+CapsLock, CapsLock, Shift, None.
    pub fn fallbacks(self) -> impl Iterator<Item = ShiftLevel> {
        let bits = self.bits();
        (0..bits)
            .rev()
            .filter(move |candidate| candidate & !bits == 0)
            .filter_map(Self::from_bits)
    }

    /// Counterpart without AltGr for AltGr-bearing levels
    pub fn altgr_counterpart(self) -> Option<Self> {
        self.has_altgr().then(|| self.without(Self::ALTGR_BIT))
    }
}
