// Keyresolve Host Interface
//
// This module defines the interface to the platform input binding,
// which the keymap probes to build its tables.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::keyval::KeyValue;
use crate::level::ShiftLevel;
use crate::modifier::ModifierBinding;
use crate::vk;

pub mod scope;
pub mod static_host;

pub use scope::ProbeScope;
pub use static_host::{StaticGroup, StaticHost, StaticSymbol};

/// Error type for host operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    /// The host could not list its keyboard layouts
    #[error("Layout enumeration failed: {0}")]
    EnumerationFailed(String),

    /// No connection to the window system
    #[error("Host unavailable")]
    Unavailable,
}

/// Opaque host handle of one keyboard layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupHandle(pub u64);

/// Result of asking the host to type one key
///
/// `count` is the number of valid entries in `symbols`; `-1` means the key
/// is dead and the host has latched it (`symbols[0]` is its spacing form).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub symbols: [u32; 2],
    pub count: i8,
}

impl ProbeResult {
    pub fn none() -> Self {
        Self {
            symbols: [0; 2],
            count: 0,
        }
    }

    pub fn one(symbol: u32) -> Self {
        Self {
            symbols: [symbol, 0],
            count: 1,
        }
    }

    pub fn two(first: u32, second: u32) -> Self {
        Self {
            symbols: [first, second],
            count: 2,
        }
    }

    pub fn dead(spacing: u32) -> Self {
        Self {
            symbols: [spacing, 0],
            count: -1,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.count == -1
    }
}

/// Lock key state reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockState {
    pub caps_lock: bool,
    pub num_lock: bool,
    pub scroll_lock: bool,
}

/// Platform input binding consumed by the keymap.
///
/// All calls happen on the thread that owns the registry.
pub trait HostKeyProbe {
    /// List the installed layouts, in group order
    fn enumerate_groups(&mut self) -> Result<Vec<GroupHandle>, HostError>;

    /// Hardware scancode of a virtual key in a layout, if it has one
    fn scancode(&self, group: GroupHandle, vk: u32) -> Option<u32>;

    /// Type `vk` with the synthetic modifier state of `level`.
    ///
    /// A dead key latches inside the host; `reset_dead_state` must follow.
    fn resolve(&mut self, group: GroupHandle, vk: u32, scancode: u32, level: ShiftLevel)
        -> ProbeResult;

    /// Forget a latched dead key
    fn reset_dead_state(&mut self, group: GroupHandle);

    /// Monotonic serial, bumped whenever the layout list changes
    fn current_layout_serial(&self) -> u64;

    fn active_group(&self) -> GroupHandle;

    /// Decimal separator of the layout's locale
    fn decimal_mark(&self, _group: GroupHandle) -> char {
        '.'
    }

    /// Raw modifier bits and the virtual keys bound to them
    fn modifier_bindings(&self) -> Vec<ModifierBinding> {
        Vec::new()
    }

    /// Key value of a non-printing virtual key
    fn named_keyval(&self, vk: u32) -> Option<KeyValue> {
        vk::named_keyval(vk)
    }

    fn lock_state(&self) -> LockState {
        LockState::default()
    }
}

/// Cloneable layout-change signal.
///
/// The host side calls `notify` (from any thread) when the layout list
/// changes; the registry compares `serial` against the serial it built from.
#[derive(Debug, Clone, Default)]
pub struct LayoutChangeNotifier {
    serial: Arc<AtomicU64>,
}

impl LayoutChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump the serial, returning the new value
    pub fn notify(&self) -> u64 {
        self.serial.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn serial(&self) -> u64 {
        self.serial.load(Ordering::SeqCst)
    }
}
