//! potluck ledger model
//!
//! data model and client adapter for a privacy-preserving ledger:
//! accounts, fungible assets, confidential (amount-hidden) notes, and
//! the capability set the pool orchestrator consumes.
//!
//! the ledger itself (proof generation, consensus, note-script
//! evaluation) is an external collaborator behind [`LedgerClient`];
//! [`MemoryLedger`] is an in-process simulation of it for tests and
//! demos.

pub mod account;
pub mod client;
pub mod memory;
pub mod note;
pub mod value;

pub use account::{Account, AccountId, AccountRole, Visibility};
pub use client::{LedgerClient, LedgerError, LedgerHeight};
pub use memory::MemoryLedger;
pub use note::{ConfidentialNote, NoteId, NoteSerial, RecipientScript, TxRef};
pub use value::{Amount, Asset, AssetId};

/// domain separator for asset id derivation
pub const ASSET_DOMAIN: &[u8] = b"potluck.asset.v1";
/// domain separator for note ids
pub const NOTE_DOMAIN: &[u8] = b"potluck.note.v1";
/// domain separator for recipient script digests
pub const SCRIPT_DOMAIN: &[u8] = b"potluck.recipient-script.v1";
