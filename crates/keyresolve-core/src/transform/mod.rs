// Keyresolve Transform Module
// Turns key events into key values: level resolution, caching, composition

pub mod cache;
pub mod compose;
pub mod deadkeys;
pub mod registry;
pub mod resolver;

pub use cache::LayoutCache;
pub use compose::ComposeMatcher;
pub use deadkeys::{ComboEntry, ComposeOutput, DeadKeyIndex, DeadKeyNode, Verdict};
pub use registry::{KeycodeEntry, KeymapKey, KeymapRegistry, Translation};
pub use resolver::{lookup_with_fallback, ModifierResolver, Resolution};
