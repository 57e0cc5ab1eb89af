// Keyresolve Layout File Parser - TOML with Serde
// Parses layout descriptions into a table-driven host

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::host::{StaticGroup, StaticHost, StaticSymbol};
use crate::keyval::KeyValue;
use crate::level::ShiftLevel;
use crate::modifier::ModifierBinding;
use crate::vk;

/// Layout file parser errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid key value: {0}")]
    InvalidKeyval(String),

    #[error("Invalid virtual key: {0}")]
    InvalidVk(String),

    #[error("Invalid shift level: {0}")]
    InvalidLevel(String),

    #[error("Too many levels for key {vk}: {count} (at most 8)")]
    TooManyLevels { vk: String, count: usize },

    #[error("Invalid modifier bit: {0}")]
    InvalidModifierBit(u8),
}

/// Root TOML table of a layout file
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LayoutFileToml {
    #[serde(default)]
    pub group: Vec<GroupToml>,

    #[serde(default)]
    pub modifier: Vec<ModifierToml>,
}

/// One `[[group]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupToml {
    pub name: String,

    #[serde(default)]
    pub decimal_mark: Option<char>,

    /// Virtual key -> symbols in level order
    #[serde(default)]
    pub keys: IndexMap<String, Vec<String>>,

    /// Virtual key -> (level name -> symbol), applied over `keys`
    #[serde(default)]
    pub levels: IndexMap<String, IndexMap<String, String>>,

    /// Accent -> (base -> result)
    #[serde(default)]
    pub compose: IndexMap<String, IndexMap<String, String>>,

    /// Virtual key -> scancode
    #[serde(default)]
    pub scancodes: IndexMap<String, u32>,
}

/// One `[[modifier]]` entry: a raw bit and the keys bound to it
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModifierToml {
    pub bit: u8,
    pub keys: Vec<String>,
}

/// A parsed layout file
#[derive(Debug, Clone, Default)]
pub struct LayoutFile {
    pub groups: Vec<StaticGroup>,
    pub bindings: Vec<ModifierBinding>,
}

impl LayoutFile {
    /// Parse a TOML layout file
    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a layout description from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let toml_layout: LayoutFileToml =
            toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;
        toml_layout.to_layout_file()
    }

    /// Parse and concatenate several files, groups in file order
    pub fn from_paths<I, P>(paths: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut merged = LayoutFile::default();
        for path in paths {
            let file = Self::from_toml_path(path)?;
            merged.groups.extend(file.groups);
            merged.bindings.extend(file.bindings);
        }
        Ok(merged)
    }

    /// Build the host these tables describe
    pub fn into_host(self) -> StaticHost {
        StaticHost::new(self.groups).with_bindings(self.bindings)
    }
}

impl LayoutFileToml {
    fn to_layout_file(&self) -> Result<LayoutFile, ConfigError> {
        let groups = self
            .group
            .iter()
            .map(GroupToml::to_group)
            .collect::<Result<Vec<_>, _>>()?;

        let bindings = self
            .modifier
            .iter()
            .map(|entry| {
                if entry.bit > 7 {
                    return Err(ConfigError::InvalidModifierBit(entry.bit));
                }
                let vks = entry
                    .keys
                    .iter()
                    .map(|key| parse_vk(key))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ModifierBinding::new(entry.bit, vks))
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Layout file parsed: {} group(s), {} modifier binding(s)",
            groups.len(),
            bindings.len()
        );
        Ok(LayoutFile { groups, bindings })
    }
}

impl GroupToml {
    fn to_group(&self) -> Result<StaticGroup, ConfigError> {
        let mut group = StaticGroup::new(&self.name);
        if let Some(mark) = self.decimal_mark {
            group = group.with_decimal_mark(mark);
        }

        for (key, symbols) in &self.keys {
            let vk = parse_vk(key)?;
            if symbols.len() > ShiftLevel::COUNT {
                return Err(ConfigError::TooManyLevels {
                    vk: key.clone(),
                    count: symbols.len(),
                });
            }
            let symbols = symbols
                .iter()
                .map(|symbol| parse_symbol(symbol))
                .collect::<Result<Vec<_>, _>>()?;
            group.set_key(vk, &symbols);
        }

        for (key, levels) in &self.levels {
            let vk = parse_vk(key)?;
            for (level, symbol) in levels {
                group.set_level(vk, parse_level(level)?, parse_symbol(symbol)?);
            }
        }

        for (accent, table) in &self.compose {
            let accent = parse_accent(accent)?;
            for (base, result) in table {
                group.set_compose(accent, parse_char(base)?, parse_char(result)?);
            }
        }

        for (key, scancode) in &self.scancodes {
            group.set_scancode(parse_vk(key)?, *scancode);
        }

        Ok(group)
    }
}

fn parse_vk(text: &str) -> Result<u32, ConfigError> {
    vk::parse_vk(text).ok_or_else(|| ConfigError::InvalidVk(text.to_string()))
}

/// `""` types nothing, `dead:<accent>` is a dead key, anything else a character
fn parse_symbol(text: &str) -> Result<StaticSymbol, ConfigError> {
    if text.is_empty() {
        return Ok(StaticSymbol::Empty);
    }
    if let Some(accent) = text.strip_prefix("dead:") {
        return parse_accent(accent).map(StaticSymbol::Dead);
    }
    parse_char(text).map(StaticSymbol::Char)
}

/// Spacing character of an accent, by accent name or any symbol name
fn parse_accent(name: &str) -> Result<char, ConfigError> {
    let spacing = match name {
        "acute" => '\u{B4}',
        "grave" => '`',
        "circumflex" => '^',
        "tilde" => '~',
        "diaeresis" => '\u{A8}',
        "macron" => '\u{AF}',
        "breve" => '\u{2D8}',
        "abovedot" => '\u{2D9}',
        "abovering" => '\u{B0}',
        "doubleacute" => '\u{2DD}',
        "caron" => '\u{2C7}',
        "cedilla" => '\u{B8}',
        "ogonek" => '\u{2DB}',
        other => return parse_char(other),
    };
    Ok(spacing)
}

/// Character typed by a named key value
fn parse_char(name: &str) -> Result<char, ConfigError> {
    KeyValue::from_name(name)
        .and_then(KeyValue::to_unicode)
        .ok_or_else(|| ConfigError::InvalidKeyval(name.to_string()))
}

/// Parse a level name such as `shift+altgr`
pub fn parse_level(text: &str) -> Result<ShiftLevel, ConfigError> {
    text.parse::<ShiftLevel>()
        .map_err(|_| ConfigError::InvalidLevel(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{GroupHandle, HostKeyProbe, ProbeResult};

    const GERMAN: &str = r#"
[[group]]
name = "de"
decimal_mark = ","

[group.keys]
"0x45" = ["e", "E", "", "", "U+20AC"]
"0x51" = ["q", "Q", "", "", "at"]
"0xDD" = ["dead:acute", "dead:grave"]
"Z" = ["z", "Z"]

[group.compose]
acute = { e = "eacute", E = "Eacute" }
grave = { e = "egrave" }

[group.scancodes]
"0xA1" = 0x36

[[modifier]]
bit = 6
keys = ["0x5B", "0x5C"]
"#;

    const INVALID_KEYVAL: &str = r#"
[[group]]
name = "de"

[group.keys]
"0x45" = ["e", "E", "", "", "EuroSign"]
"#;

    #[test]
    fn test_parse_layout_file() {
        let file = LayoutFile::from_toml(GERMAN).unwrap();
        assert_eq!(file.groups.len(), 1);
        assert_eq!(file.groups[0].name(), "de");
        assert_eq!(file.bindings, vec![ModifierBinding::new(6, vec![0x5B, 0x5C])]);
    }

    #[test]
    fn test_layout_file_host() {
        let file = LayoutFile::from_toml(GERMAN).unwrap();
        let mut host = file.into_host();
        let g = GroupHandle(0);

        assert_eq!(host.decimal_mark(g), ',');
        assert_eq!(host.scancode(g, 0xA1), Some(0x36));
        assert_eq!(
            host.resolve(g, 0x45, 0x45, ShiftLevel::AltGr),
            ProbeResult::one(0x20AC)
        );
        assert_eq!(host.resolve(g, 0x51, 0x51, ShiftLevel::AltGr), ProbeResult::one('@' as u32));
        assert_eq!(host.resolve(g, 0x45, 0x45, ShiftLevel::CapsLock), ProbeResult::none());

        assert!(host.resolve(g, 0xDD, 0xDD, ShiftLevel::None).is_dead());
        assert_eq!(host.resolve(g, 0x45, 0x45, ShiftLevel::None), ProbeResult::one(0xE9));
    }

    #[test]
    fn test_unknown_keyval() {
        let err = LayoutFile::from_toml(INVALID_KEYVAL).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidKeyval(name) if name == "EuroSign"));
    }

    #[test]
    fn test_invalid_vk() {
        let toml = r#"
[[group]]
name = "x"
[group.keys]
"0x1FF" = ["a"]
"#;
        assert!(matches!(LayoutFile::from_toml(toml), Err(ConfigError::InvalidVk(_))));
    }

    #[test]
    fn test_too_many_levels() {
        let toml = r#"
[[group]]
name = "x"
[group.keys]
"0x41" = ["a", "b", "c", "d", "e", "f", "g", "h", "i"]
"#;
        assert!(matches!(
            LayoutFile::from_toml(toml),
            Err(ConfigError::TooManyLevels { count: 9, .. })
        ));
    }

    #[test]
    fn test_invalid_modifier_bit() {
        let toml = "[[modifier]]\nbit = 9\nkeys = []\n";
        assert!(matches!(
            LayoutFile::from_toml(toml),
            Err(ConfigError::InvalidModifierBit(9))
        ));
    }

    #[test]
    fn test_toml_error() {
        assert!(matches!(
            LayoutFile::from_toml("[[group]]\nname = 3\n"),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_groups_keep_file_order() {
        let toml = r#"
[[group]]
name = "us"
[[group]]
name = "il"
[[group]]
name = "de"
"#;
        let file = LayoutFile::from_toml(toml).unwrap();
        let names: Vec<&str> = file.groups.iter().map(StaticGroup::name).collect();
        assert_eq!(names, vec!["us", "il", "de"]);
    }

    #[test]
    fn test_level_overrides() {
        let toml = r#"
[[group]]
name = "de"
[group.keys]
"0x51" = ["q", "Q"]
[group.levels]
"0x51" = { altgr = "at", "shift+altgr" = "dead:ogonek" }
"0x4D" = { capslock = "M" }
"#;
        let mut host = LayoutFile::from_toml(toml).unwrap().into_host();
        let g = GroupHandle(0);
        assert_eq!(host.resolve(g, 0x51, 0x51, ShiftLevel::Shift), ProbeResult::one('Q' as u32));
        assert_eq!(host.resolve(g, 0x51, 0x51, ShiftLevel::AltGr), ProbeResult::one('@' as u32));
        assert!(host.resolve(g, 0x51, 0x51, ShiftLevel::ShiftAltGr).is_dead());
        host.reset_dead_state(g);
        // a key only named in [group.levels] still gets a row
        assert_eq!(host.scancode(g, 0x4D), Some(0x4D));
        assert_eq!(host.resolve(g, 0x4D, 0x4D, ShiftLevel::None), ProbeResult::none());
        assert_eq!(host.resolve(g, 0x4D, 0x4D, ShiftLevel::CapsLock), ProbeResult::one('M' as u32));
    }

    #[test]
    fn test_invalid_level_name() {
        let toml = r#"
[[group]]
name = "x"
[group.levels]
"0x41" = { hyper = "a" }
"#;
        assert!(matches!(
            LayoutFile::from_toml(toml),
            Err(ConfigError::InvalidLevel(name)) if name == "hyper"
        ));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("shift+altgr").unwrap(), ShiftLevel::ShiftAltGr);
        assert!(matches!(parse_level("hyper"), Err(ConfigError::InvalidLevel(_))));
    }
}
