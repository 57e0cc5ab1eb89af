// Keyresolve Key Values
// Symbolic key identifiers, their names and their Unicode forms

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

/// Opaque symbolic identifier for a resolved key.
///
/// The numeric space follows the X keysym convention: Latin-1 characters
/// map to themselves, other Unicode scalars are stored as
/// `0x0100_0000 | codepoint`, and function keys live in the `0xFFxx` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct KeyValue(pub u32);

/// Offset of directly encoded 24-bit Unicode scalars.
const UNICODE_OFFSET: u32 = 0x0100_0000;

impl KeyValue {
    /// No symbol is produced by this key at this level.
    pub const VOID: KeyValue = KeyValue(0x00FF_FFFF);

    pub const BACKSPACE: KeyValue = KeyValue(0xFF08);
    pub const TAB: KeyValue = KeyValue(0xFF09);
    pub const LINEFEED: KeyValue = KeyValue(0xFF0A);
    pub const CLEAR: KeyValue = KeyValue(0xFF0B);
    pub const RETURN: KeyValue = KeyValue(0xFF0D);
    pub const PAUSE: KeyValue = KeyValue(0xFF13);
    pub const SCROLL_LOCK: KeyValue = KeyValue(0xFF14);
    pub const ESCAPE: KeyValue = KeyValue(0xFF1B);
    pub const DELETE: KeyValue = KeyValue(0xFFFF);
    pub const ISO_LEFT_TAB: KeyValue = KeyValue(0xFE20);
    pub const ISO_LEVEL3_SHIFT: KeyValue = KeyValue(0xFE03);

    pub const HOME: KeyValue = KeyValue(0xFF50);
    pub const LEFT: KeyValue = KeyValue(0xFF51);
    pub const UP: KeyValue = KeyValue(0xFF52);
    pub const RIGHT: KeyValue = KeyValue(0xFF53);
    pub const DOWN: KeyValue = KeyValue(0xFF54);
    pub const PRIOR: KeyValue = KeyValue(0xFF55);
    pub const NEXT: KeyValue = KeyValue(0xFF56);
    pub const END: KeyValue = KeyValue(0xFF57);
    pub const SELECT: KeyValue = KeyValue(0xFF60);
    pub const PRINT: KeyValue = KeyValue(0xFF61);
    pub const EXECUTE: KeyValue = KeyValue(0xFF62);
    pub const INSERT: KeyValue = KeyValue(0xFF63);
    pub const MENU: KeyValue = KeyValue(0xFF67);
    pub const CANCEL: KeyValue = KeyValue(0xFF69);
    pub const HELP: KeyValue = KeyValue(0xFF6A);
    pub const NUM_LOCK: KeyValue = KeyValue(0xFF7F);

    pub const KP_SPACE: KeyValue = KeyValue(0xFF80);
    pub const KP_TAB: KeyValue = KeyValue(0xFF89);
    pub const KP_ENTER: KeyValue = KeyValue(0xFF8D);
    pub const KP_HOME: KeyValue = KeyValue(0xFF95);
    pub const KP_LEFT: KeyValue = KeyValue(0xFF96);
    pub const KP_UP: KeyValue = KeyValue(0xFF97);
    pub const KP_RIGHT: KeyValue = KeyValue(0xFF98);
    pub const KP_DOWN: KeyValue = KeyValue(0xFF99);
    pub const KP_PRIOR: KeyValue = KeyValue(0xFF9A);
    pub const KP_NEXT: KeyValue = KeyValue(0xFF9B);
    pub const KP_END: KeyValue = KeyValue(0xFF9C);
    pub const KP_BEGIN: KeyValue = KeyValue(0xFF9D);
    pub const KP_INSERT: KeyValue = KeyValue(0xFF9E);
    pub const KP_DELETE: KeyValue = KeyValue(0xFF9F);
    pub const KP_MULTIPLY: KeyValue = KeyValue(0xFFAA);
    pub const KP_ADD: KeyValue = KeyValue(0xFFAB);
    pub const KP_SEPARATOR: KeyValue = KeyValue(0xFFAC);
    pub const KP_SUBTRACT: KeyValue = KeyValue(0xFFAD);
    pub const KP_DECIMAL: KeyValue = KeyValue(0xFFAE);
    pub const KP_DIVIDE: KeyValue = KeyValue(0xFFAF);
    pub const KP_0: KeyValue = KeyValue(0xFFB0);
    pub const KP_9: KeyValue = KeyValue(0xFFB9);
    pub const KP_EQUAL: KeyValue = KeyValue(0xFFBD);

    pub const F1: KeyValue = KeyValue(0xFFBE);

    pub const SHIFT_L: KeyValue = KeyValue(0xFFE1);
    pub const SHIFT_R: KeyValue = KeyValue(0xFFE2);
    pub const CONTROL_L: KeyValue = KeyValue(0xFFE3);
    pub const CONTROL_R: KeyValue = KeyValue(0xFFE4);
    pub const CAPS_LOCK: KeyValue = KeyValue(0xFFE5);
    pub const META_L: KeyValue = KeyValue(0xFFE7);
    pub const META_R: KeyValue = KeyValue(0xFFE8);
    pub const ALT_L: KeyValue = KeyValue(0xFFE9);
    pub const ALT_R: KeyValue = KeyValue(0xFFEA);
    pub const SUPER_L: KeyValue = KeyValue(0xFFEB);
    pub const SUPER_R: KeyValue = KeyValue(0xFFEC);
    pub const HYPER_L: KeyValue = KeyValue(0xFFED);
    pub const HYPER_R: KeyValue = KeyValue(0xFFEE);

    pub const DEAD_GRAVE: KeyValue = KeyValue(0xFE50);
    pub const DEAD_ACUTE: KeyValue = KeyValue(0xFE51);
    pub const DEAD_CIRCUMFLEX: KeyValue = KeyValue(0xFE52);
    pub const DEAD_TILDE: KeyValue = KeyValue(0xFE53);
    pub const DEAD_MACRON: KeyValue = KeyValue(0xFE54);
    pub const DEAD_BREVE: KeyValue = KeyValue(0xFE55);
    pub const DEAD_ABOVEDOT: KeyValue = KeyValue(0xFE56);
    pub const DEAD_DIAERESIS: KeyValue = KeyValue(0xFE57);
    pub const DEAD_ABOVERING: KeyValue = KeyValue(0xFE58);
    pub const DEAD_DOUBLEACUTE: KeyValue = KeyValue(0xFE59);
    pub const DEAD_CARON: KeyValue = KeyValue(0xFE5A);
    pub const DEAD_CEDILLA: KeyValue = KeyValue(0xFE5B);
    pub const DEAD_OGONEK: KeyValue = KeyValue(0xFE5C);
    pub const DEAD_IOTA: KeyValue = KeyValue(0xFE5D);
    pub const DEAD_BELOWDOT: KeyValue = KeyValue(0xFE60);
    pub const DEAD_HOOK: KeyValue = KeyValue(0xFE61);

    /// Get the raw numeric value
    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn is_void(self) -> bool {
        self == Self::VOID
    }

    /// Map a Unicode scalar to its key value.
    pub fn from_unicode(c: char) -> Self {
        Self::from_codepoint(c as u32)
    }

    /// Map a raw Unicode code point to its key value.
    ///
    /// Control characters that have a dedicated function key map to it;
    /// invalid code points produce `VOID`.
    pub fn from_codepoint(cp: u32) -> Self {
        match cp {
            0x08 => Self::BACKSPACE,
            0x09 => Self::TAB,
            0x0A => Self::LINEFEED,
            0x0D => Self::RETURN,
            0x1B => Self::ESCAPE,
            0x7F => Self::DELETE,
            0x20..=0x7E | 0xA0..=0xFF => KeyValue(cp),
            _ if char::from_u32(cp).is_some() => KeyValue(UNICODE_OFFSET | cp),
            _ => Self::VOID,
        }
    }

    /// The Unicode character this key value types, if any.
    pub fn to_unicode(self) -> Option<char> {
        let v = self.0;
        let cp = match v {
            0x20..=0x7E | 0xA0..=0xFF => v,
            0x0100_0000..=0x0110_FFFF => v & 0x00FF_FFFF,
            0xFF08 | 0xFF09 | 0xFF0A | 0xFF0D | 0xFF1B => v & 0xFF,
            0xFFFF => 0x7F,
            0xFF80 => 0x20,
            0xFF89 => 0x09,
            0xFF8D => 0x0D,
            0xFFBD => u32::from('='),
            // KP_Multiply .. KP_Divide and KP_0 .. KP_9 sit 0xFF80 above ASCII
            0xFFAA..=0xFFB9 => v - 0xFF80,
            _ => return None,
        };
        char::from_u32(cp)
    }

    /// Directly encoded Unicode scalar (the `0x01xxxxxx` block)
    pub fn is_unicode(self) -> bool {
        (self.0 & 0xFF00_0000) == UNICODE_OFFSET
    }

    pub fn is_dead(self) -> bool {
        (0xFE50..=0xFE8F).contains(&self.0)
    }

    pub fn is_keypad(self) -> bool {
        (0xFF80..=0xFFBD).contains(&self.0)
    }

    pub fn is_modifier_key(self) -> bool {
        (0xFFE1..=0xFFEE).contains(&self.0)
            || self == Self::ISO_LEVEL3_SHIFT
            || self == KeyValue(0xFF7E)
            || self == Self::NUM_LOCK
    }

    /// Navigation meaning of a keypad digit key, if it has one.
    pub fn keypad_navigation(self) -> Option<KeyValue> {
        KEYPAD_PAIRS
            .iter()
            .find(|(digit, _)| *digit == self)
            .map(|(_, nav)| *nav)
    }

    /// Digit meaning of a keypad navigation key, if it has one.
    pub fn keypad_digit(self) -> Option<KeyValue> {
        KEYPAD_PAIRS
            .iter()
            .find(|(_, nav)| *nav == self)
            .map(|(digit, _)| *digit)
    }

    /// Get the symbolic name of this key value
    ///
    /// Unnamed Unicode values are rendered as `U+XXXX`, anything else as hex.
    pub fn name(self) -> String {
        if let Some(name) = static_name(self) {
            return name.to_string();
        }
        if self.is_unicode() {
            format!("U+{:04X}", self.0 & 0x00FF_FFFF)
        } else {
            format!("{:#x}", self.0)
        }
    }

    /// Parse a key value from its symbolic name
    ///
    /// Accepts table names (`Tab`, `eacute`), `U+00E1`/`U00E1`, hex (`0xff09`)
    /// and single characters.
    pub fn from_name(name: &str) -> Option<KeyValue> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        if let Some(value) = name_table().iter().find(|(n, _)| *n == name).map(|(_, v)| *v) {
            return Some(KeyValue(value));
        }
        if let Some(caps) = unicode_name_pattern().captures(name) {
            let cp = u32::from_str_radix(&caps[1], 16).ok()?;
            let value = KeyValue::from_codepoint(cp);
            return (!value.is_void()).then_some(value);
        }
        if let Some(hex) = name.strip_prefix("0x").or_else(|| name.strip_prefix("0X")) {
            return u32::from_str_radix(hex, 16).ok().map(KeyValue);
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeyValue::from_unicode(c)),
            _ => None,
        }
    }
}

impl From<u32> for KeyValue {
    fn from(raw: u32) -> Self {
        KeyValue(raw)
    }
}

impl From<KeyValue> for u32 {
    fn from(value: KeyValue) -> Self {
        value.0
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for KeyValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyValue::from_name(s).ok_or_else(|| format!("Unknown key value: {}", s))
    }
}

/// Keypad keys as (Num-Lock on, Num-Lock off) pairs
const KEYPAD_PAIRS: [(KeyValue, KeyValue); 11] = [
    (KeyValue(0xFFB0), KeyValue::KP_INSERT),
    (KeyValue(0xFFB1), KeyValue::KP_END),
    (KeyValue(0xFFB2), KeyValue::KP_DOWN),
    (KeyValue(0xFFB3), KeyValue::KP_NEXT),
    (KeyValue(0xFFB4), KeyValue::KP_LEFT),
    (KeyValue(0xFFB5), KeyValue::KP_BEGIN),
    (KeyValue(0xFFB6), KeyValue::KP_RIGHT),
    (KeyValue(0xFFB7), KeyValue::KP_HOME),
    (KeyValue(0xFFB8), KeyValue::KP_UP),
    (KeyValue(0xFFB9), KeyValue::KP_PRIOR),
    (KeyValue::KP_DECIMAL, KeyValue::KP_DELETE),
];

fn unicode_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^U\+?([0-9A-Fa-f]{4,6})$").expect("hard-coded pattern"))
}

fn static_name(value: KeyValue) -> Option<&'static str> {
    name_table()
        .iter()
        .find(|(_, v)| *v == value.0)
        .map(|(n, _)| *n)
}

const LATIN1_UPPER_NAMES: [&str; 31] = [
    "Agrave", "Aacute", "Acircumflex", "Atilde", "Adiaeresis", "Aring", "AE", "Ccedilla",
    "Egrave", "Eacute", "Ecircumflex", "Ediaeresis", "Igrave", "Iacute", "Icircumflex",
    "Idiaeresis", "ETH", "Ntilde", "Ograve", "Oacute", "Ocircumflex", "Otilde", "Odiaeresis",
    "multiply", "Oslash", "Ugrave", "Uacute", "Ucircumflex", "Udiaeresis", "Yacute", "THORN",
];

const LATIN1_LOWER_NAMES: [&str; 32] = [
    "ssharp", "agrave", "aacute", "acircumflex", "atilde", "adiaeresis", "aring", "ae",
    "ccedilla", "egrave", "eacute", "ecircumflex", "ediaeresis", "igrave", "iacute",
    "icircumflex", "idiaeresis", "eth", "ntilde", "ograve", "oacute", "ocircumflex", "otilde",
    "odiaeresis", "division", "oslash", "ugrave", "uacute", "ucircumflex", "udiaeresis",
    "yacute", "thorn",
];

const LATIN1_SYMBOL_NAMES: [&str; 32] = [
    "nobreakspace", "exclamdown", "cent", "sterling", "currency", "yen", "brokenbar", "section",
    "diaeresis", "copyright", "ordfeminine", "guillemotleft", "notsign", "hyphen", "registered",
    "macron", "degree", "plusminus", "twosuperior", "threesuperior", "acute", "mu", "paragraph",
    "periodcentered", "cedilla", "onesuperior", "masculine", "guillemotright", "onequarter",
    "onehalf", "threequarters", "questiondown",
];

const ASCII_PUNCT_NAMES: [(&str, u32); 32] = [
    ("space", 0x20), ("exclam", 0x21), ("quotedbl", 0x22), ("numbersign", 0x23),
    ("dollar", 0x24), ("percent", 0x25), ("ampersand", 0x26), ("apostrophe", 0x27),
    ("parenleft", 0x28), ("parenright", 0x29), ("asterisk", 0x2A), ("plus", 0x2B),
    ("comma", 0x2C), ("minus", 0x2D), ("period", 0x2E), ("slash", 0x2F),
    ("colon", 0x3A), ("semicolon", 0x3B), ("less", 0x3C), ("equal", 0x3D),
    ("greater", 0x3E), ("question", 0x3F), ("at", 0x40), ("bracketleft", 0x5B),
    ("backslash", 0x5C), ("bracketright", 0x5D), ("asciicircum", 0x5E), ("underscore", 0x5F),
    ("grave", 0x60), ("braceleft", 0x7B), ("bar", 0x7C), ("braceright", 0x7D),
];

const FUNCTION_NAMES: [(&str, u32); 88] = [
    ("BackSpace", 0xFF08), ("Tab", 0xFF09), ("Linefeed", 0xFF0A), ("Clear", 0xFF0B),
    ("Return", 0xFF0D), ("Pause", 0xFF13), ("Scroll_Lock", 0xFF14), ("Sys_Req", 0xFF15),
    ("Escape", 0xFF1B), ("Delete", 0xFFFF), ("ISO_Left_Tab", 0xFE20),
    ("ISO_Level3_Shift", 0xFE03), ("Mode_switch", 0xFF7E),
    ("Home", 0xFF50), ("Left", 0xFF51), ("Up", 0xFF52), ("Right", 0xFF53), ("Down", 0xFF54),
    ("Prior", 0xFF55), ("Next", 0xFF56), ("End", 0xFF57), ("Begin", 0xFF58),
    ("Select", 0xFF60), ("Print", 0xFF61), ("Execute", 0xFF62), ("Insert", 0xFF63),
    ("Menu", 0xFF67), ("Cancel", 0xFF69), ("Help", 0xFF6A), ("Break", 0xFF6B),
    ("Num_Lock", 0xFF7F),
    ("KP_Space", 0xFF80), ("KP_Tab", 0xFF89), ("KP_Enter", 0xFF8D), ("KP_Home", 0xFF95),
    ("KP_Left", 0xFF96), ("KP_Up", 0xFF97), ("KP_Right", 0xFF98), ("KP_Down", 0xFF99),
    ("KP_Prior", 0xFF9A), ("KP_Next", 0xFF9B), ("KP_End", 0xFF9C), ("KP_Begin", 0xFF9D),
    ("KP_Insert", 0xFF9E), ("KP_Delete", 0xFF9F), ("KP_Multiply", 0xFFAA), ("KP_Add", 0xFFAB),
    ("KP_Separator", 0xFFAC), ("KP_Subtract", 0xFFAD), ("KP_Decimal", 0xFFAE),
    ("KP_Divide", 0xFFAF), ("KP_Equal", 0xFFBD),
    ("Shift_L", 0xFFE1), ("Shift_R", 0xFFE2), ("Control_L", 0xFFE3), ("Control_R", 0xFFE4),
    ("Caps_Lock", 0xFFE5), ("Shift_Lock", 0xFFE6), ("Meta_L", 0xFFE7), ("Meta_R", 0xFFE8),
    ("Alt_L", 0xFFE9), ("Alt_R", 0xFFEA), ("Super_L", 0xFFEB), ("Super_R", 0xFFEC),
    ("Hyper_L", 0xFFED), ("Hyper_R", 0xFFEE),
    ("dead_grave", 0xFE50), ("dead_acute", 0xFE51), ("dead_circumflex", 0xFE52),
    ("dead_tilde", 0xFE53), ("dead_macron", 0xFE54), ("dead_breve", 0xFE55),
    ("dead_abovedot", 0xFE56), ("dead_diaeresis", 0xFE57), ("dead_abovering", 0xFE58),
    ("dead_doubleacute", 0xFE59), ("dead_caron", 0xFE5A), ("dead_cedilla", 0xFE5B),
    ("dead_ogonek", 0xFE5C), ("dead_iota", 0xFE5D), ("dead_belowdot", 0xFE60),
    ("dead_hook", 0xFE61),
    ("VoidSymbol", 0x00FF_FFFF),
    // Spacing accents outside Latin-1
    ("breve", 0x0100_02D8), ("ogonek", 0x0100_02DB), ("caron", 0x0100_02C7),
    ("doubleacute", 0x0100_02DD), ("abovedot", 0x0100_02D9),
];

/// Name table, built once
fn name_table() -> &'static [(&'static str, u32)] {
    static NAMES: OnceLock<Vec<(&'static str, u32)>> = OnceLock::new();
    NAMES.get_or_init(|| {
        let mut names: Vec<(&'static str, u32)> = Vec::with_capacity(320);
        names.extend_from_slice(&FUNCTION_NAMES);
        names.extend_from_slice(&ASCII_PUNCT_NAMES);
        names.extend(
            ('0'..='9')
                .chain('A'..='Z')
                .chain('a'..='z')
                .map(|c| (ascii_name(c), u32::from(c))),
        );
        names.push(("asciitilde", 0x7E));
        names.extend(LATIN1_SYMBOL_NAMES.iter().zip(0xA0u32..).map(|(n, v)| (*n, v)));
        names.extend(LATIN1_UPPER_NAMES.iter().zip(0xC0u32..).map(|(n, v)| (*n, v)));
        names.extend(LATIN1_LOWER_NAMES.iter().zip(0xDFu32..).map(|(n, v)| (*n, v)));
        names.push(("ydiaeresis", 0xFF));
        for i in 0..24u32 {
            names.push((function_key_name(i), KeyValue::F1.0 + i));
        }
        for i in 0..10u32 {
            names.push((keypad_digit_name(i), KeyValue::KP_0.0 + i));
        }
        names
    })
}

fn ascii_name(c: char) -> &'static str {
    const ALNUM: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    ALNUM
        .find(c)
        .map(|i| &ALNUM[i..i + 1])
        .unwrap_or("")
}

fn function_key_name(index: u32) -> &'static str {
    const NAMES: [&str; 24] = [
        "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12", "F13", "F14",
        "F15", "F16", "F17", "F18", "F19", "F20", "F21", "F22", "F23", "F24",
    ];
    NAMES[index as usize]
}

fn keypad_digit_name(index: u32) -> &'static str {
    const NAMES: [&str; 10] = [
        "KP_0", "KP_1", "KP_2", "KP_3", "KP_4", "KP_5", "KP_6", "KP_7", "KP_8", "KP_9",
    ];
    NAMES[index as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_maps_directly() {
        assert_eq!(KeyValue::from_unicode('a'), KeyValue(0x61));
        assert_eq!(KeyValue::from_unicode('é'), KeyValue(0xE9));
        assert_eq!(KeyValue(0xE9).to_unicode(), Some('é'));
    }

    #[test]
    fn test_unicode_block_encoding() {
        let alef = KeyValue::from_unicode('א');
        assert_eq!(alef, KeyValue(0x0100_05D0));
        assert!(alef.is_unicode());
        assert_eq!(alef.to_unicode(), Some('א'));
    }

    #[test]
    fn test_control_characters_map_to_function_keys() {
        assert_eq!(KeyValue::from_codepoint(0x09), KeyValue::TAB);
        assert_eq!(KeyValue::from_codepoint(0x1B), KeyValue::ESCAPE);
        assert_eq!(KeyValue::TAB.to_unicode(), Some('\t'));
        assert_eq!(KeyValue::from_codepoint(0xD800), KeyValue::VOID);
    }

    #[test]
    fn test_keypad_unicode() {
        assert_eq!(KeyValue(0xFFB7).to_unicode(), Some('7'));
        assert_eq!(KeyValue::KP_ADD.to_unicode(), Some('+'));
        assert_eq!(KeyValue::KP_DECIMAL.to_unicode(), Some('.'));
        assert_eq!(KeyValue::KP_HOME.to_unicode(), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(KeyValue::TAB.name(), "Tab");
        assert_eq!(KeyValue(0x41).name(), "A");
        assert_eq!(KeyValue(0xE9).name(), "eacute");
        assert_eq!(KeyValue(0xDF).name(), "ssharp");
        assert_eq!(KeyValue(0xFFC9).name(), "F12");
        assert_eq!(KeyValue(0x0100_05D0).name(), "U+05D0");
    }

    #[test]
    fn test_from_name() {
        assert_eq!(KeyValue::from_name("Tab"), Some(KeyValue::TAB));
        assert_eq!(KeyValue::from_name("eacute"), Some(KeyValue(0xE9)));
        assert_eq!(KeyValue::from_name("U+05D0"), Some(KeyValue(0x0100_05D0)));
        assert_eq!(KeyValue::from_name("U00E1"), Some(KeyValue(0xE1)));
        assert_eq!(KeyValue::from_name("0xff09"), Some(KeyValue::TAB));
        assert_eq!(KeyValue::from_name("ß"), Some(KeyValue(0xDF)));
        assert_eq!(KeyValue::from_name("dead_acute"), Some(KeyValue::DEAD_ACUTE));
        assert_eq!(KeyValue::from_name("no_such_key"), None);
        assert_eq!(KeyValue::from_name(""), None);
    }

    #[test]
    fn test_keypad_pairs() {
        assert_eq!(KeyValue(0xFFB7).keypad_navigation(), Some(KeyValue::KP_HOME));
        assert_eq!(KeyValue::KP_DELETE.keypad_digit(), Some(KeyValue::KP_DECIMAL));
        assert_eq!(KeyValue::KP_ADD.keypad_navigation(), None);
    }

    #[test]
    fn test_classification() {
        assert!(KeyValue::DEAD_ACUTE.is_dead());
        assert!(!KeyValue(0xB4).is_dead());
        assert!(KeyValue::KP_ENTER.is_keypad());
        assert!(KeyValue::SUPER_L.is_modifier_key());
        assert!(!KeyValue(0x61).is_modifier_key());
    }
}
