// Keyresolve Core Library
// Keyboard layout resolution and dead-key composition

pub mod case;
pub mod config;
pub mod host;
pub mod keyval;
pub mod layout;
pub mod level;
pub mod modifier;
pub mod settings;
pub mod transform;
pub mod vk;

pub use config::{ConfigError, LayoutFile};
pub use host::{
    GroupHandle, HostError, HostKeyProbe, LayoutChangeNotifier, LockState, ProbeResult,
    ProbeScope, StaticGroup, StaticHost, StaticSymbol,
};
pub use keyval::KeyValue;
pub use layout::{Direction, Group, GroupOptions, LayoutTable};
pub use level::ShiftLevel;
pub use modifier::{ModifierBinding, ModifierIntent, ModifierMask, VirtualModifierMap};
pub use settings::{Settings, SettingsError};
pub use transform::{
    ComboEntry, ComposeMatcher, ComposeOutput, DeadKeyIndex, DeadKeyNode, KeycodeEntry,
    KeymapKey, KeymapRegistry, ModifierResolver, Resolution, Translation, Verdict,
};
