// Keyresolve Modifier Resolver
// Picks the shift level for a modifier state and derives the consumed modifiers

use crate::case;
use crate::keyval::KeyValue;
use crate::layout::{GroupOptions, KeyRow};
use crate::level::ShiftLevel;
use crate::modifier::ModifierMask;

/// Result of resolving one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub keyval: KeyValue,
    /// Level the key value was read from
    pub level: ShiftLevel,
    /// Modifiers that take part in choosing this key's symbol
    pub consumed: ModifierMask,
}

/// Level-selecting inputs extracted from a modifier state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct LevelInputs {
    shift: bool,
    caps: bool,
    altgr: bool,
    num_lock: bool,
}

impl LevelInputs {
    const COUNT: usize = 4;

    fn flag(&self, index: usize) -> bool {
        match index {
            0 => self.shift,
            1 => self.caps,
            2 => self.altgr,
            _ => self.num_lock,
        }
    }

    fn with_flag(mut self, index: usize, value: bool) -> Self {
        match index {
            0 => self.shift = value,
            1 => self.caps = value,
            2 => self.altgr = value,
            _ => self.num_lock = value,
        }
        self
    }

    fn from_index(combo: usize) -> Self {
        (0..Self::COUNT).fold(Self::default(), |inputs, index| {
            inputs.with_flag(index, combo & (1 << index) != 0)
        })
    }
}

/// Converts modifier states into shift levels for one group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifierResolver {
    options: GroupOptions,
    ctrl_alt_is_altgr: bool,
}

impl ModifierResolver {
    pub fn new(options: GroupOptions, ctrl_alt_is_altgr: bool) -> Self {
        Self {
            options,
            ctrl_alt_is_altgr,
        }
    }

    /// Resolve a key's row under `state`.
    ///
    /// A level whose entry is `VOID` falls back through its sub-levels.
    /// A bit is reported consumed when flipping it alone changes the key
    /// value for at least one setting of the other level bits, so every bit
    /// left out of `consumed` never affects this key.
    pub fn resolve(&self, row: &KeyRow, state: ModifierMask) -> Resolution {
        let inputs = LevelInputs {
            shift: state.contains(ModifierMask::SHIFT),
            caps: state.contains(ModifierMask::LOCK),
            altgr: self.altgr_active(state),
            num_lock: state.contains(ModifierMask::NUM_LOCK),
        };
        let (keyval, level) = self.evaluate(row, inputs);

        Resolution {
            keyval,
            level,
            consumed: self.consumed(row),
        }
    }

    fn altgr_active(&self, state: ModifierMask) -> bool {
        if !self.options.has_altgr {
            return false;
        }
        state.contains(ModifierMask::ALT_GR)
            || (self.ctrl_alt_is_altgr
                && state.contains(ModifierMask::CONTROL | ModifierMask::ALT))
    }

    fn consumed(&self, row: &KeyRow) -> ModifierMask {
        let mut consumed = ModifierMask::empty();
        for index in 0..LevelInputs::COUNT {
            let matters = (0..1usize << LevelInputs::COUNT)
                .map(LevelInputs::from_index)
                .filter(|inputs| !inputs.flag(index))
                .any(|inputs| {
                    self.evaluate(row, inputs).0
                        != self.evaluate(row, inputs.with_flag(index, true)).0
                });
            if matters {
                consumed |= self.mask_of(index);
            }
        }
        consumed
    }

    fn mask_of(&self, index: usize) -> ModifierMask {
        match index {
            0 => ModifierMask::SHIFT,
            1 => ModifierMask::LOCK,
            2 if self.ctrl_alt_is_altgr => {
                ModifierMask::ALT_GR | ModifierMask::CONTROL | ModifierMask::ALT
            }
            2 => ModifierMask::ALT_GR,
            _ => ModifierMask::NUM_LOCK,
        }
    }

    fn evaluate(&self, row: &KeyRow, inputs: LevelInputs) -> (KeyValue, ShiftLevel) {
        let altgr = inputs.altgr && self.options.has_altgr;
        let requested = ShiftLevel::from_flags(inputs.shift, inputs.caps, altgr);
        let (keyval, level) = lookup_with_fallback(row, requested);
        (self.keypad(keyval, inputs), level)
    }

    /// Pick the digit or navigation meaning of a keypad key.
    ///
    /// Shift and CapsLock cancel Num-Lock.
    fn keypad(&self, keyval: KeyValue, inputs: LevelInputs) -> KeyValue {
        let digit = if keyval.keypad_navigation().is_some() {
            keyval
        } else if let Some(digit) = keyval.keypad_digit() {
            digit
        } else {
            return keyval;
        };

        let numeric = inputs.num_lock && !inputs.shift && !inputs.caps;
        if !numeric {
            return digit.keypad_navigation().unwrap_or(digit);
        }
        if digit == KeyValue::KP_DECIMAL && self.options.decimal_mark == ',' {
            KeyValue::KP_SEPARATOR
        } else {
            digit
        }
    }
}

/// Key value at `requested`, falling back through its sub-levels.
///
/// When the request includes CapsLock and the value comes from a level
/// without it, the value is upper-cased (lower-cased under Shift).
pub fn lookup_with_fallback(row: &KeyRow, requested: ShiftLevel) -> (KeyValue, ShiftLevel) {
    let direct = row[requested.index()];
    if !direct.is_void() {
        return (direct, requested);
    }

    for level in requested.fallbacks() {
        let keyval = row[level.index()];
        if keyval.is_void() {
            continue;
        }
        if requested.has_caps_lock() && !level.has_caps_lock() {
            let (lower, upper) = case::convert_case(keyval);
            return (if requested.has_shift() { lower } else { upper }, level);
        }
        return (keyval, level);
    }

    (KeyValue::VOID, requested)
}
