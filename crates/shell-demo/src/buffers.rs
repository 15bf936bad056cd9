//! Ownership of the attached `wl_buffer`
//!
//! A compositor may release a buffer while it is still the attached one. Such
//! a buffer gets no further release, so it has to be destroyed when it is
//! replaced instead.

/// The attached buffer and whether the compositor is done with it
#[derive(Debug)]
pub struct BufferSlot<B> {
    current: Option<B>,
    released: bool,
}

impl<B> Default for BufferSlot<B> {
    fn default() -> Self {
        Self {
            current: None,
            released: false,
        }
    }
}

impl<B: PartialEq> BufferSlot<B> {
    /// Attach `buffer`. Returns the previous buffer if it can be destroyed now.
    pub fn replace(&mut self, buffer: B) -> Option<B> {
        let previous = self.current.replace(buffer);
        let released = std::mem::replace(&mut self.released, false);
        previous.filter(|_| released)
    }

    /// Handle a release. Returns true when the buffer should be destroyed.
    pub fn release(&mut self, buffer: &B) -> bool {
        if self.current.as_ref() == Some(buffer) {
            self.released = true;
            false
        } else {
            true
        }
    }

    /// Detach the current buffer for destruction
    pub fn take(&mut self) -> Option<B> {
        self.released = false;
        self.current.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn early_release_is_destroyed_on_replace() {
        let mut slot = BufferSlot::default();
        assert_eq!(slot.replace(1), None);
        assert!(!slot.release(&1));

        assert_eq!(slot.replace(2), Some(1));
    }

    #[test]
    fn late_release_is_destroyed_on_release() {
        let mut slot = BufferSlot::default();
        slot.replace(1);

        assert_eq!(slot.replace(2), None);
        assert!(slot.release(&1));
    }

    #[test]
    fn release_flag_does_not_carry_over() {
        let mut slot = BufferSlot::default();
        slot.replace(1);
        slot.release(&1);
        assert_eq!(slot.replace(2), Some(1));

        // 2 was never released, so it waits for its own release
        assert_eq!(slot.replace(3), None);
        assert!(slot.release(&2));
    }

    #[test]
    fn take_clears_slot() {
        let mut slot = BufferSlot::default();
        slot.replace(1);
        slot.release(&1);

        assert_eq!(slot.take(), Some(1));
        assert_eq!(slot.replace(2), None);
    }
}
