//! confidential notes
//!
//! a note carries assets to a recipient account; with private
//! visibility the amount and contents are not disclosed on the public
//! ledger, only the note's existence and its eventual consumption

use serde::{Deserialize, Serialize};

use crate::account::{AccountId, Visibility};
use crate::value::Asset;
use crate::{NOTE_DOMAIN, SCRIPT_DOMAIN};

/// random note serial (256 bits)
///
/// drawn independently per note; reuse across notes breaks
/// unlinkability and risks double-count collisions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NoteSerial(pub [u8; 32]);

impl NoteSerial {
    pub fn random<R: rand::RngCore>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }
}

/// opaque note-consumption predicate bound to a target account
///
/// a pre-verified artifact supplied by the ledger ecosystem: "only the
/// target account may consume this note and must apply its assets to
/// its own balance". the orchestrator attaches it to each note and
/// never interprets it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipientScript {
    target: AccountId,
    digest: [u8; 32],
}

impl RecipientScript {
    /// bind the consume predicate to a target account
    pub fn for_account(target: AccountId) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(SCRIPT_DOMAIN);
        hasher.update(&target.0);
        Self {
            target,
            digest: *hasher.finalize().as_bytes(),
        }
    }

    /// the only account allowed to consume notes carrying this script
    pub fn target(&self) -> AccountId {
        self.target
    }

    pub fn digest(&self) -> [u8; 32] {
        self.digest
    }
}

/// note identifier, derived from serial + recipient + script
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(pub [u8; 32]);

impl core::fmt::Display for NoteId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

/// transaction reference returned by the ledger
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxRef(pub [u8; 32]);

impl TxRef {
    /// short hex form for proofs and step details
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl core::fmt::Display for TxRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// a value-transfer note addressed to a recipient account
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfidentialNote {
    /// account the assets are addressed to
    pub recipient: AccountId,
    /// ordered assets carried by the note
    pub assets: Vec<Asset>,
    /// private = amount and contents hidden on the public ledger
    pub visibility: Visibility,
    /// fresh random serial, never reused
    pub serial: NoteSerial,
    /// consume predicate bound to the recipient
    pub script: RecipientScript,
}

impl ConfidentialNote {
    pub fn new(
        recipient: AccountId,
        assets: Vec<Asset>,
        visibility: Visibility,
        serial: NoteSerial,
        script: RecipientScript,
    ) -> Self {
        Self {
            recipient,
            assets,
            visibility,
            serial,
            script,
        }
    }

    /// note id (published on the ledger; commits to no amount)
    pub fn id(&self) -> NoteId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(NOTE_DOMAIN);
        hasher.update(&self.serial.0);
        hasher.update(&self.recipient.0);
        hasher.update(&self.script.digest());
        NoteId(*hasher.finalize().as_bytes())
    }
}
