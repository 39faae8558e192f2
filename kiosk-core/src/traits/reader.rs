//! Card reader trait

use crate::card::Uid;

/// Trait for an RFID reader polled from the controller loop
pub trait CardReader {
    /// Check for a newly presented card
    ///
    /// Returns `Some(uid)` once per presentation. Implementations halt the
    /// card after reading it so it is not reported again on the next poll.
    /// Read errors are reported as `None`.
    fn poll(&mut self) -> Option<Uid>;
}

impl<T: CardReader + ?Sized> CardReader for &mut T {
    fn poll(&mut self) -> Option<Uid> {
        (**self).poll()
    }
}

/// A missing reader never sees a card
impl<T: CardReader> CardReader for Option<T> {
    fn poll(&mut self) -> Option<Uid> {
        self.as_mut()?.poll()
    }
}
