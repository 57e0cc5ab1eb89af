// Keyresolve Virtual Keys
// Virtual-key numbering and the key values of non-printing keys

use crate::keyval::KeyValue;

/// Size of the virtual-key space; every table row is indexed by `0..VK_COUNT`.
pub const VK_COUNT: usize = 256;

pub const VK_CANCEL: u32 = 0x03;
pub const VK_BACK: u32 = 0x08;
pub const VK_TAB: u32 = 0x09;
pub const VK_CLEAR: u32 = 0x0C;
pub const VK_RETURN: u32 = 0x0D;
pub const VK_SHIFT: u32 = 0x10;
pub const VK_CONTROL: u32 = 0x11;
pub const VK_MENU: u32 = 0x12;
pub const VK_PAUSE: u32 = 0x13;
pub const VK_CAPITAL: u32 = 0x14;
pub const VK_ESCAPE: u32 = 0x1B;
pub const VK_SPACE: u32 = 0x20;
pub const VK_PRIOR: u32 = 0x21;
pub const VK_NEXT: u32 = 0x22;
pub const VK_END: u32 = 0x23;
pub const VK_HOME: u32 = 0x24;
pub const VK_LEFT: u32 = 0x25;
pub const VK_UP: u32 = 0x26;
pub const VK_RIGHT: u32 = 0x27;
pub const VK_DOWN: u32 = 0x28;
pub const VK_SELECT: u32 = 0x29;
pub const VK_PRINT: u32 = 0x2A;
pub const VK_EXECUTE: u32 = 0x2B;
pub const VK_SNAPSHOT: u32 = 0x2C;
pub const VK_INSERT: u32 = 0x2D;
pub const VK_DELETE: u32 = 0x2E;
pub const VK_HELP: u32 = 0x2F;
pub const VK_LWIN: u32 = 0x5B;
pub const VK_RWIN: u32 = 0x5C;
pub const VK_APPS: u32 = 0x5D;
pub const VK_NUMPAD0: u32 = 0x60;
pub const VK_NUMPAD9: u32 = 0x69;
pub const VK_MULTIPLY: u32 = 0x6A;
pub const VK_ADD: u32 = 0x6B;
pub const VK_SEPARATOR: u32 = 0x6C;
pub const VK_SUBTRACT: u32 = 0x6D;
pub const VK_DECIMAL: u32 = 0x6E;
pub const VK_DIVIDE: u32 = 0x6F;
pub const VK_F1: u32 = 0x70;
pub const VK_F24: u32 = 0x87;
pub const VK_NUMLOCK: u32 = 0x90;
pub const VK_SCROLL: u32 = 0x91;
pub const VK_LSHIFT: u32 = 0xA0;
pub const VK_RSHIFT: u32 = 0xA1;
pub const VK_LCONTROL: u32 = 0xA2;
pub const VK_RCONTROL: u32 = 0xA3;
pub const VK_LMENU: u32 = 0xA4;
pub const VK_RMENU: u32 = 0xA5;

/// Key value of a non-printing virtual key, independent of the layout.
///
/// Printable keys return `None` and are resolved through the host.
pub fn named_keyval(vk: u32) -> Option<KeyValue> {
    let keyval = match vk {
        VK_CANCEL => KeyValue::CANCEL,
        VK_BACK => KeyValue::BACKSPACE,
        VK_CLEAR => KeyValue::CLEAR,
        VK_RETURN => KeyValue::RETURN,
        VK_SHIFT | VK_LSHIFT => KeyValue::SHIFT_L,
        VK_RSHIFT => KeyValue::SHIFT_R,
        VK_CONTROL | VK_LCONTROL => KeyValue::CONTROL_L,
        VK_RCONTROL => KeyValue::CONTROL_R,
        VK_MENU | VK_LMENU => KeyValue::ALT_L,
        VK_RMENU => KeyValue::ALT_R,
        VK_PAUSE => KeyValue::PAUSE,
        VK_CAPITAL => KeyValue::CAPS_LOCK,
        VK_ESCAPE => KeyValue::ESCAPE,
        VK_PRIOR => KeyValue::PRIOR,
        VK_NEXT => KeyValue::NEXT,
        VK_END => KeyValue::END,
        VK_HOME => KeyValue::HOME,
        VK_LEFT => KeyValue::LEFT,
        VK_UP => KeyValue::UP,
        VK_RIGHT => KeyValue::RIGHT,
        VK_DOWN => KeyValue::DOWN,
        VK_SELECT => KeyValue::SELECT,
        VK_PRINT | VK_SNAPSHOT => KeyValue::PRINT,
        VK_EXECUTE => KeyValue::EXECUTE,
        VK_INSERT => KeyValue::INSERT,
        VK_DELETE => KeyValue::DELETE,
        VK_HELP => KeyValue::HELP,
        VK_LWIN => KeyValue::SUPER_L,
        VK_RWIN => KeyValue::SUPER_R,
        VK_APPS => KeyValue::MENU,
        VK_NUMPAD0..=VK_NUMPAD9 => KeyValue(KeyValue::KP_0.raw() + (vk - VK_NUMPAD0)),
        VK_MULTIPLY => KeyValue::KP_MULTIPLY,
        VK_ADD => KeyValue::KP_ADD,
        VK_SEPARATOR => KeyValue::KP_SEPARATOR,
        VK_SUBTRACT => KeyValue::KP_SUBTRACT,
        VK_DECIMAL => KeyValue::KP_DECIMAL,
        VK_DIVIDE => KeyValue::KP_DIVIDE,
        VK_F1..=VK_F24 => KeyValue(KeyValue::F1.raw() + (vk - VK_F1)),
        VK_NUMLOCK => KeyValue::NUM_LOCK,
        VK_SCROLL => KeyValue::SCROLL_LOCK,
        _ => return None,
    };
    Some(keyval)
}

/// Parse `0x41`, `65` or a single ASCII letter/digit (`A`) as a virtual key
pub fn parse_vk(text: &str) -> Option<u32> {
    let text = text.trim();
    let value = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Ok(decimal) = text.parse::<u32>() {
        decimal
    } else {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphanumeric() => u32::from(c.to_ascii_uppercase()),
            _ => return None,
        }
    };
    (value < VK_COUNT as u32).then_some(value)
}
