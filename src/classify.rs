// src/classify.rs
//! Pure classification of resolver output into mutually exclusive states.
//!
//! No I/O and no failure modes. Check order is significant and must not be
//! rearranged: account existence dominates atom existence dominates triple
//! existence, and an absent origin URL dominates everything else.

use crate::types::{AccountTrustData, OriginTrustData};
use serde::{Deserialize, Serialize};

/// Trust state of a destination address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountState {
    /// No account record in the knowledge graph
    NoAccount,
    /// Account record exists but has no linked atom
    AccountWithoutAtom,
    /// Atom exists but no is/trustworthy triple
    AccountWithoutTrustData,
    /// Atom and trust triple both exist
    AccountWithTrustData,
}

impl AccountState {
    /// True when no atom exists yet for the address.
    pub fn lacks_atom(&self) -> bool {
        matches!(self, AccountState::NoAccount | AccountState::AccountWithoutAtom)
    }
}

/// Trust state of a dApp origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OriginState {
    /// No origin URL was provided for this transaction
    NoOrigin,
    /// Origin URL given but no atom resolved for it
    NoAtom,
    /// Atom exists but no has-tag/trustworthy triple
    AtomWithoutTrustTriple,
    /// Atom and trust triple both exist
    AtomWithTrustTriple,
}

impl OriginState {
    /// The two states in which an origin atom exists.
    pub fn has_atom(&self) -> bool {
        matches!(
            self,
            OriginState::AtomWithoutTrustTriple | OriginState::AtomWithTrustTriple
        )
    }
}

/// Classify account resolver output. Precedence: account, then atom, then
/// triple; a triple value is ignored once the account or atom is absent.
pub fn classify_account(data: &AccountTrustData) -> AccountState {
    let Some(account) = &data.account else {
        return AccountState::NoAccount;
    };
    if account.atom_id.is_none() {
        return AccountState::AccountWithoutAtom;
    }
    if data.triple.is_none() {
        return AccountState::AccountWithoutTrustData;
    }
    AccountState::AccountWithTrustData
}

/// Classify origin resolver output. `origin_url_provided` is checked before
/// any other field, even if an atom happened to resolve from a stale
/// hostname.
pub fn classify_origin(data: &OriginTrustData, origin_url_provided: bool) -> OriginState {
    if !origin_url_provided {
        return OriginState::NoOrigin;
    }
    if data.origin.is_none() {
        return OriginState::NoAtom;
    }
    if data.triple.is_none() {
        return OriginState::AtomWithoutTrustTriple;
    }
    OriginState::AtomWithTrustTriple
}
