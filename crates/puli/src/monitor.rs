//! Cooperative cancellation
//!
//! Engines poll their monitor once per iteration of their main loop. Setting
//! the flag stops the loop after the element in flight; results already
//! reported stay valid.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub trait InterruptMonitor {
    fn is_interrupted(&self) -> bool;
}

/// Monitor that never interrupts
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverInterrupted;

impl InterruptMonitor for NeverInterrupted {
    fn is_interrupted(&self) -> bool {
        false
    }
}

impl InterruptMonitor for AtomicBool {
    fn is_interrupted(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<M: InterruptMonitor + ?Sized> InterruptMonitor for Arc<M> {
    fn is_interrupted(&self) -> bool {
        (**self).is_interrupted()
    }
}

impl<M: InterruptMonitor + ?Sized> InterruptMonitor for &M {
    fn is_interrupted(&self) -> bool {
        (**self).is_interrupted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_flag() {
        let cancel = Arc::new(AtomicBool::new(false));
        let monitor: Box<dyn InterruptMonitor> = Box::new(Arc::clone(&cancel));
        assert!(!monitor.is_interrupted());
        cancel.store(true, Ordering::Relaxed);
        assert!(monitor.is_interrupted());
        assert!(!NeverInterrupted.is_interrupted());
    }
}
