//! Write-once output slots
//!
//! Actions that produce a value write it into an [`OutputSlot`] handed in by
//! the caller. The slot is written by at most one execution path before the
//! action returns and read after, so the lock is never contended.

use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Debug)]
pub struct OutputSlot<T> {
    value: Arc<Mutex<Option<T>>>,
}

impl<T> OutputSlot<T> {
    pub fn new() -> Self {
        Self {
            value: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set(&self, value: T) {
        *self.value.lock() = Some(value);
    }

    pub fn take(&self) -> Option<T> {
        self.value.lock().take()
    }

    pub fn is_set(&self) -> bool {
        self.value.lock().is_some()
    }
}

impl<T: Clone> OutputSlot<T> {
    pub fn get(&self) -> Option<T> {
        self.value.lock().clone()
    }
}

impl<T> Clone for OutputSlot<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
        }
    }
}

impl<T> Default for OutputSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_value() {
        let slot = OutputSlot::new();
        let writer = slot.clone();
        assert!(!slot.is_set());

        writer.set(3usize);
        assert_eq!(slot.get(), Some(3));
        assert_eq!(slot.take(), Some(3));
        assert!(!writer.is_set());
    }
}
