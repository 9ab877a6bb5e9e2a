// src/query/mod.rs
pub mod graphql;
pub mod rpc;

#[cfg(test)]
pub(crate) mod testing;

pub use graphql::GraphQlExecutor;
pub use rpc::{CodeProvider, JsonRpcCodeProvider};

use crate::error::TrustResult;
use async_trait::async_trait;
use serde_json::Value;

/// Named queries the resolvers issue against the knowledge graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryName {
    /// Account record by raw address or CAIP-10 id, limit 1
    AccountByAddress,
    /// Trust triple for an account atom (subject = atom, predicate = is,
    /// object = trustworthy)
    AccountTrustTriple,
    /// Nickname triples for an atom, ordered by total market cap descending
    NicknameTriples,
    /// Atom for a dApp origin, by full URL or bare hostname
    OriginAtom,
    /// Trust triple for an origin atom (predicate = has tag)
    OriginTagTriple,
    /// Positions the user holds on is/trustworthy claims
    TrustedPositions,
}

impl QueryName {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryName::AccountByAddress => "account_by_address",
            QueryName::AccountTrustTriple => "account_trust_triple",
            QueryName::NicknameTriples => "nickname_triples",
            QueryName::OriginAtom => "origin_atom",
            QueryName::OriginTagTriple => "origin_tag_triple",
            QueryName::TrustedPositions => "trusted_positions",
        }
    }
}

/// Executes a named query with variables against a knowledge-graph endpoint.
/// Implementations supply no retry or backoff; a failure surfaces once,
/// immediately, as `TrustError::QueryFailure`.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, name: QueryName, variables: Value) -> TrustResult<Value>;
}
