// src/types.rs
use serde::{Deserialize, Serialize};

/// On-chain account record from the knowledge graph. `atom_id` is null when
/// the account has been seen on-chain but never linked to a graph entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: String,
    pub atom_id: Option<String>,
    pub label: Option<String>,
}

/// A knowledge-graph entity. Represents either an account or a dApp origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atom {
    pub term_id: String,
    pub label: Option<String>,
    pub image: Option<String>,
    /// Raw registered value: an address for account atoms, a URL or hostname
    /// for origin atoms.
    pub data: Option<String>,
}

/// One account's stake in a vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub account_id: String,
    pub account_label: Option<String>,
    /// Share amount as a big-integer string; never parsed into a float.
    pub shares: String,
}

/// Staking pool attached to one side of a triple.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vault {
    /// Market capitalization as an 18-decimal-scaled big-integer string.
    pub market_cap: String,
    pub position_count: u64,
    pub positions: Vec<Position>,
}

/// A subject-predicate-object trust claim with its support and counter vaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Triple {
    pub term_id: String,
    pub subject_id: String,
    pub predicate_id: String,
    pub object_id: String,
    pub vault: Vault,
    pub counter_vault: Vault,
}

impl Triple {
    pub fn positions(&self) -> &[Position] {
        &self.vault.positions
    }

    pub fn counter_positions(&self) -> &[Position] {
        &self.counter_vault.positions
    }

    /// Case-insensitive check for an existing position on either side.
    /// An account may support or oppose; both lists are checked independently.
    pub fn has_position_from(&self, address: &str) -> bool {
        let needle = normalize_address(address);
        self.vault
            .positions
            .iter()
            .chain(self.counter_vault.positions.iter())
            .any(|p| normalize_address(&p.account_id) == needle)
    }
}

/// Account Resolver output, ready for classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountTrustData {
    pub account: Option<AccountRecord>,
    pub triple: Option<Triple>,
    pub is_contract: bool,
    pub nickname: Option<String>,
}

impl AccountTrustData {
    pub fn empty(is_contract: bool) -> Self {
        Self {
            account: None,
            triple: None,
            is_contract,
            nickname: None,
        }
    }
}

/// Origin Resolver output. `hostname` is kept even when no atom resolves so
/// the caller can still name the site it could not verify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginTrustData {
    pub origin: Option<Atom>,
    pub triple: Option<Triple>,
    pub hostname: Option<String>,
}

impl OriginTrustData {
    pub fn absent() -> Self {
        Self {
            origin: None,
            triple: None,
            hostname: None,
        }
    }
}

/// An account the user has backed on an "is trustworthy" claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedContact {
    pub account_id: String,
    pub label: String,
}

/// Normalize an address for keying and comparison.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Check for the standard 0x-prefixed 20-byte hex address shape.
pub fn is_standard_address(value: &str) -> bool {
    value.len() == 42
        && value.starts_with("0x")
        && value[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Shorten an address for display: first 6 chars, ellipsis, last 4.
/// Namespaced labels (ENS names and the like) and anything that is not a
/// standard address pass through unchanged.
pub fn truncate_address(value: &str) -> String {
    if !is_standard_address(value) {
        return value.to_string();
    }
    format!("{}…{}", &value[..6], &value[value.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(account_id: &str) -> Position {
        Position {
            account_id: account_id.to_string(),
            account_label: None,
            shares: "1000".to_string(),
        }
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(
            normalize_address(" 0xAbCd0000000000000000000000000000000000Ef "),
            "0xabcd0000000000000000000000000000000000ef"
        );
    }

    #[test]
    fn test_truncate_address() {
        assert_eq!(
            truncate_address("0xd8da6bf26964af9d7eed9e03e53415d37aa96045"),
            "0xd8da…6045"
        );
        // Not a standard address shape: unchanged
        assert_eq!(truncate_address("vitalik.eth"), "vitalik.eth");
        assert_eq!(truncate_address("0x123"), "0x123");
        // Right length, bad hex: unchanged
        assert_eq!(
            truncate_address("0xZZda6bf26964af9d7eed9e03e53415d37aa96045"),
            "0xZZda6bf26964af9d7eed9e03e53415d37aa96045"
        );
    }

    #[test]
    fn test_has_position_from_checks_both_vaults() {
        let triple = Triple {
            term_id: "t1".to_string(),
            subject_id: "s".to_string(),
            predicate_id: "p".to_string(),
            object_id: "o".to_string(),
            vault: Vault {
                market_cap: "0".to_string(),
                position_count: 1,
                positions: vec![position("0xAAA0000000000000000000000000000000000001")],
            },
            counter_vault: Vault {
                market_cap: "0".to_string(),
                position_count: 1,
                positions: vec![position("0xBBB0000000000000000000000000000000000002")],
            },
        };

        // Case-insensitive on both sides
        assert!(triple.has_position_from("0xaaa0000000000000000000000000000000000001"));
        assert!(triple.has_position_from("0xBBB0000000000000000000000000000000000002"));
        assert!(!triple.has_position_from("0xccc0000000000000000000000000000000000003"));
    }
}
