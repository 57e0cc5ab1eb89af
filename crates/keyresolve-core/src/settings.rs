// Keyresolve Settings Module
// User-configurable switches for composition, AltGr emulation and default layouts

use std::path::{Path, PathBuf};

/// Settings that control keymap behavior
///
/// These settings are loaded from a TOML file
/// (default: ~/.config/keyresolve/settings.toml).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Dead-key composition on/off
    compose_enabled: bool,

    /// Treat Control+Alt as AltGr on layouts that have AltGr
    ctrl_alt_is_altgr: bool,

    /// Layout description files loaded when none are given explicitly
    layout_files: Vec<PathBuf>,

    /// Path to the settings file (for reload)
    source_path: Option<PathBuf>,
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid setting value: {0}")]
    InvalidValue(String),
}

/// TOML representation for deserializing settings
#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SettingsToml {
    #[serde(default)]
    compose: Option<ComposeSettings>,

    #[serde(default)]
    modifiers: Option<ModifierSettings>,

    #[serde(default)]
    layout: Option<LayoutSettings>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct ComposeSettings {
    #[serde(default)]
    enabled: Option<toml::Value>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct ModifierSettings {
    #[serde(default)]
    ctrl_alt_is_altgr: Option<toml::Value>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct LayoutSettings {
    #[serde(default)]
    files: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Create settings with every switch at its default
    pub fn new() -> Self {
        Self {
            compose_enabled: true,
            ctrl_alt_is_altgr: true,
            layout_files: Vec::new(),
            source_path: None,
        }
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let mut settings = Self::from_toml(&content)?;
        settings.source_path = Some(path.as_ref().to_path_buf());
        Ok(settings)
    }

    /// Load settings from TOML string
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let toml_settings: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;

        let mut settings = Self::new();

        if let Some(value) = toml_settings.compose.and_then(|c| c.enabled) {
            settings.compose_enabled = parse_bool_value(&value)?;
        }

        if let Some(value) = toml_settings.modifiers.and_then(|m| m.ctrl_alt_is_altgr) {
            settings.ctrl_alt_is_altgr = parse_bool_value(&value)?;
        }

        if let Some(layout) = toml_settings.layout {
            settings.layout_files = layout.files;
        }

        Ok(settings)
    }

    /// Get the default settings path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("keyresolve").join("settings.toml"))
    }

    /// Load from default location (~/.config/keyresolve/settings.toml)
    pub fn load_default() -> Result<Self, SettingsError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        // Return default settings if file doesn't exist
        Ok(Self::new())
    }

    pub fn compose_enabled(&self) -> bool {
        self.compose_enabled
    }

    pub fn set_compose_enabled(&mut self, enabled: bool) {
        self.compose_enabled = enabled;
    }

    pub fn ctrl_alt_is_altgr(&self) -> bool {
        self.ctrl_alt_is_altgr
    }

    pub fn set_ctrl_alt_is_altgr(&mut self, enabled: bool) {
        self.ctrl_alt_is_altgr = enabled;
    }

    /// Layout files, relative paths resolved against the settings file
    pub fn layout_files(&self) -> Vec<PathBuf> {
        let base = self.source_path.as_deref().and_then(Path::parent);
        self.layout_files
            .iter()
            .map(|file| match base {
                Some(dir) if file.is_relative() => dir.join(file),
                _ => file.clone(),
            })
            .collect()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Reload settings from the original file
    pub fn reload(&mut self) -> Result<(), SettingsError> {
        if let Some(ref path) = self.source_path {
            let new_settings = Self::from_file(path)?;
            *self = new_settings;
            Ok(())
        } else {
            Err(SettingsError::InvalidValue("No source path set".to_string()))
        }
    }
}

/// Parse a TOML value as a boolean
fn parse_bool_value(value: &toml::Value) -> Result<bool, SettingsError> {
    match value {
        toml::Value::Boolean(b) => Ok(*b),
        toml::Value::Integer(1) => Ok(true),
        toml::Value::Integer(0) => Ok(false),
        toml::Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(SettingsError::InvalidValue(format!(
                "Cannot convert '{}' to boolean",
                s
            ))),
        },
        _ => Err(SettingsError::InvalidValue(format!(
            "Cannot convert {:?} to boolean",
            value
        ))),
    }
}

/// Create default settings content for a new installation
pub fn default_settings_content() -> &'static str {
    r#"# Keyresolve Settings
# Place this file at: ~/.config/keyresolve/settings.toml

[compose]
# Combine dead keys with the following key
enabled = true

[modifiers]
# Treat Control+Alt as AltGr on layouts that have an AltGr level
ctrl_alt_is_altgr = true

[layout]
# Layout description files used when none are given on the command line
# files = ["us.toml", "de.toml"]
files = []
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::new();
        assert!(settings.compose_enabled());
        assert!(settings.ctrl_alt_is_altgr());
        assert!(settings.layout_files().is_empty());
    }

    #[test]
    fn test_settings_from_toml() {
        let toml = r#"
[compose]
enabled = false

[modifiers]
ctrl_alt_is_altgr = false

[layout]
files = ["/etc/keyresolve/us.toml"]
"#;

        let settings = Settings::from_toml(toml).unwrap();
        assert!(!settings.compose_enabled());
        assert!(!settings.ctrl_alt_is_altgr());
        assert_eq!(
            settings.layout_files(),
            vec![PathBuf::from("/etc/keyresolve/us.toml")]
        );
    }

    #[test]
    fn test_settings_with_string_values() {
        let toml = r#"
[compose]
enabled = "off"

[modifiers]
ctrl_alt_is_altgr = "yes"
"#;

        let settings = Settings::from_toml(toml).unwrap();
        assert!(!settings.compose_enabled());
        assert!(settings.ctrl_alt_is_altgr());
    }

    #[test]
    fn test_settings_integer_values() {
        let settings = Settings::from_toml("[compose]\nenabled = 0\n").unwrap();
        assert!(!settings.compose_enabled());
        assert!(Settings::from_toml("[compose]\nenabled = 2\n").is_err());
    }

    #[test]
    fn test_invalid_bool_string() {
        let err = Settings::from_toml("[compose]\nenabled = \"maybe\"\n").unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue(_)));
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert!(matches!(
            Settings::from_toml("[features]\nx = true\n"),
            Err(SettingsError::TomlParse(_))
        ));
    }

    #[test]
    fn test_default_content_parses() {
        let settings = Settings::from_toml(default_settings_content()).unwrap();
        assert_eq!(settings, Settings::new());
    }

    #[test]
    fn test_relative_layout_files() {
        let dir = std::env::temp_dir().join("keyresolve-settings-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(&path, "[layout]\nfiles = [\"us.toml\"]\n").unwrap();

        let mut settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.layout_files(), vec![dir.join("us.toml")]);
        assert!(settings.reload().is_ok());
        assert!(Settings::new().reload().is_err());
    }
}
