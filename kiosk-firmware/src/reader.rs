//! MFRC522 card reader
//!
//! Adapts the `mfrc522` driver to the kiosk's polling [`CardReader`].

use defmt::*;
use mfrc522::comm::Interface;
use mfrc522::{Initialized, Mfrc522};

use kiosk_core::card::Uid;
use kiosk_core::traits::CardReader;

/// Initialized MFRC522 on any bus interface
pub struct Mfrc522Reader<COMM: Interface> {
    mfrc: Mfrc522<COMM, Initialized>,
}

impl<COMM: Interface> Mfrc522Reader<COMM> {
    pub fn new(mfrc: Mfrc522<COMM, Initialized>) -> Self {
        Self { mfrc }
    }
}

impl<COMM: Interface> CardReader for Mfrc522Reader<COMM> {
    /// Report a newly presented card once, then put it to sleep
    ///
    /// No card and bus or collision errors all read as "nothing presented".
    fn poll(&mut self) -> Option<Uid> {
        let atqa = self.mfrc.new_card_present().ok()?;
        let selected = self.mfrc.select(&atqa).ok()?;

        let uid = match Uid::new(selected.as_bytes()) {
            Ok(uid) => Some(uid),
            Err(e) => {
                warn!("Unusable card UID: {:?}", e);
                None
            }
        };

        // A halted card stays quiet until it leaves the field
        if self.mfrc.hlta().is_err() {
            debug!("HLTA not acknowledged");
        }
        uid
    }
}
