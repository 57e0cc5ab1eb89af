// Keyresolve Config API
// Layout description files

pub mod parser;

pub use parser::{parse_level, ConfigError, LayoutFile, LayoutFileToml};
