// Keyresolve Compose Matcher
// Pending dead-key sequence of one input session

use smallvec::SmallVec;

use crate::host::HostKeyProbe;
use crate::keyval::KeyValue;
use crate::transform::deadkeys::{ComposeOutput, Verdict};
use crate::transform::registry::KeymapRegistry;

/// Buffer of pending key values for one composition attempt.
///
/// Terminal verdicts clear the buffer. There is no timeout: callers reset
/// on focus loss or an explicit cancel. A layout rebuild between two keys
/// drops the pending sequence.
#[derive(Debug, Clone, Default)]
pub struct ComposeMatcher {
    buffer: SmallVec<[KeyValue; 2]>,
    serial: Option<u64>,
}

impl ComposeMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key value and match the pending sequence
    pub fn feed<P: HostKeyProbe>(
        &mut self,
        registry: &mut KeymapRegistry<P>,
        keyval: KeyValue,
    ) -> (Verdict, ComposeOutput) {
        registry.refresh();
        if !self.buffer.is_empty() && self.serial != registry.serial() {
            log::debug!("Layout changed during composition, dropping pending keys");
            self.buffer.clear();
        }
        self.serial = registry.serial();

        self.buffer.push(keyval);
        let (verdict, output) = registry.check_compose(&self.buffer);
        if verdict.is_terminal() {
            self.buffer.clear();
        }
        (verdict, output)
    }

    pub fn pending(&self) -> &[KeyValue] {
        &self.buffer
    }

    pub fn is_pending(&self) -> bool {
        !self.buffer.is_empty()
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}
