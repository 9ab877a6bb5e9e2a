// src/chains.rs
use crate::error::{TrustError, TrustResult};
use crate::types::normalize_address;
use std::collections::HashMap;

/// Per-chain term ids for the claims this crate cares about. The account
/// trust claim uses `is_predicate` + `trustworthy_object`; the origin trust
/// claim uses `tag_predicate` + the same object. The two predicates are
/// configured independently per chain and must not be unified.
#[derive(Debug, Clone)]
pub struct TrustPredicates {
    /// "is" predicate term id (account trust claims)
    pub is_predicate: String,
    /// "trustworthy" object term id
    pub trustworthy_object: String,
    /// "has tag" predicate term id (origin trust claims)
    pub tag_predicate: String,
    /// "related nickname" predicate term id
    pub nickname_predicate: String,
}

/// Configuration bundle for one supported chain.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: &'static str,
    /// Knowledge-graph endpoint for this chain
    pub graph_endpoint: String,
    /// JSON-RPC endpoint used for the contract-vs-EOA code lookup
    pub rpc_url: String,
    pub predicates: TrustPredicates,
}

impl ChainConfig {
    /// CAIP-10 account id for an address on this chain.
    pub fn caip10_account_id(&self, address: &str) -> String {
        format!("eip155:{}:{}", self.chain_id, normalize_address(address))
    }
}

/// Static registry of supported chains. Lookup failure is a hard error and
/// always surfaces before any query executes.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: HashMap<u64, ChainConfig>,
}

impl ChainRegistry {
    pub fn new(chains: Vec<ChainConfig>) -> Self {
        Self {
            chains: chains.into_iter().map(|c| (c.chain_id, c)).collect(),
        }
    }

    /// Resolve a chain reference in any accepted encoding.
    pub fn lookup(&self, chain: &str) -> TrustResult<&ChainConfig> {
        let chain_id = parse_chain_id(chain)
            .ok_or_else(|| TrustError::ConfigNotFound(chain.to_string()))?;
        self.chains
            .get(&chain_id)
            .ok_or_else(|| TrustError::ConfigNotFound(chain.to_string()))
    }

    pub fn supported_chains(&self) -> Vec<u64> {
        self.chains.keys().copied().collect()
    }

    /// Default registry
    fn default_chains() -> Vec<ChainConfig> {
        vec![
            ChainConfig {
                chain_id: 8453,
                name: "Base",
                graph_endpoint: "https://prod.base.intuition-api.com/v1/graphql".to_string(),
                rpc_url: "https://mainnet.base.org".to_string(),
                predicates: TrustPredicates {
                    is_predicate: "15772".to_string(),
                    trustworthy_object: "98822".to_string(),
                    tag_predicate: "25273".to_string(),
                    nickname_predicate: "33721".to_string(),
                },
            },
            ChainConfig {
                chain_id: 84532,
                name: "Base Sepolia",
                graph_endpoint: "https://dev.base-sepolia.intuition-api.com/v1/graphql".to_string(),
                rpc_url: "https://sepolia.base.org".to_string(),
                predicates: TrustPredicates {
                    is_predicate: "107".to_string(),
                    trustworthy_object: "122".to_string(),
                    tag_predicate: "94".to_string(),
                    nickname_predicate: "131".to_string(),
                },
            },
        ]
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::new(Self::default_chains())
    }
}

/// Normalize a chain reference to its numeric id. Accepts a plain decimal id
/// (`"8453"`), CAIP-2 (`"eip155:8453"`), and a CAIP-10 account id
/// (`"caip10:eip155:8453:0x…"` or `"eip155:8453:0x…"`).
pub fn parse_chain_id(chain: &str) -> Option<u64> {
    let chain = chain.trim();
    if let Ok(id) = chain.parse::<u64>() {
        return Some(id);
    }
    let rest = chain.strip_prefix("caip10:").unwrap_or(chain);
    let mut parts = rest.split(':');
    match (parts.next(), parts.next()) {
        (Some("eip155"), Some(id)) => id.parse::<u64>().ok(),
        _ => None,
    }
}
