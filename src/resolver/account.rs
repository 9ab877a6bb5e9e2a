// src/resolver/account.rs
use crate::chains::{ChainConfig, ChainRegistry};
use crate::error::{TrustError, TrustResult};
use crate::query::{CodeProvider, QueryExecutor, QueryName};
use crate::types::{AccountRecord, AccountTrustData, Atom, Triple, normalize_address};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct AccountsResponse {
    accounts: Vec<AccountRecord>,
}

#[derive(Debug, Deserialize)]
struct TriplesResponse {
    triples: Vec<Triple>,
}

#[derive(Debug, Deserialize)]
struct NicknameResponse {
    triples: Vec<NicknameRow>,
}

#[derive(Debug, Deserialize)]
struct NicknameRow {
    object: Atom,
}

/// Resolves the trust state of a destination address: account record, linked
/// atom, is/trustworthy triple, display nickname, and contract-vs-EOA status.
///
/// Failure policy: an unknown chain fails fast before any I/O; any query or
/// RPC failure after that point is logged and propagated. There is no
/// partial result for address classification.
pub struct AccountResolver {
    executor: Arc<dyn QueryExecutor>,
    code: Arc<dyn CodeProvider>,
    registry: ChainRegistry,
}

impl AccountResolver {
    pub fn new(
        executor: Arc<dyn QueryExecutor>,
        code: Arc<dyn CodeProvider>,
        registry: ChainRegistry,
    ) -> Self {
        Self {
            executor,
            code,
            registry,
        }
    }

    pub async fn resolve(&self, address: &str, chain: &str) -> TrustResult<AccountTrustData> {
        // Single authoritative chain lookup; ConfigNotFound surfaces here,
        // before any query executes.
        let config = self.registry.lookup(chain)?;

        let result = self.resolve_with_config(address, config).await;
        if let Err(e) = &result {
            tracing::error!(
                category = e.category(),
                error = %e,
                address,
                chain_id = config.chain_id,
                "account resolution failed"
            );
        }
        result
    }

    async fn resolve_with_config(
        &self,
        address: &str,
        config: &ChainConfig,
    ) -> TrustResult<AccountTrustData> {
        let address = normalize_address(address);
        let caip10 = config.caip10_account_id(&address);

        let (account, is_contract) = tokio::try_join!(
            self.fetch_account(&address, &caip10),
            self.code.is_contract(&config.rpc_url, &address),
        )?;

        let Some(account) = account else {
            return Ok(AccountTrustData::empty(is_contract));
        };

        let Some(atom_id) = account.atom_id.clone() else {
            return Ok(AccountTrustData {
                account: Some(account),
                triple: None,
                is_contract,
                nickname: None,
            });
        };

        let (triple, nickname) = tokio::try_join!(
            self.fetch_trust_triple(&atom_id, config),
            self.fetch_nickname(&atom_id, config),
        )?;

        Ok(AccountTrustData {
            account: Some(account),
            triple,
            is_contract,
            nickname,
        })
    }

    /// Account record matching the raw address or its CAIP-10 form, limit 1.
    async fn fetch_account(
        &self,
        address: &str,
        caip10: &str,
    ) -> TrustResult<Option<AccountRecord>> {
        let data = self
            .executor
            .execute(
                QueryName::AccountByAddress,
                json!({ "address": address, "caip10": caip10 }),
            )
            .await?;
        let parsed: AccountsResponse = serde_json::from_value(data)
            .map_err(|e| malformed(QueryName::AccountByAddress, e))?;
        Ok(parsed.accounts.into_iter().next())
    }

    /// The is/trustworthy triple for the account's atom, if one exists.
    async fn fetch_trust_triple(
        &self,
        atom_id: &str,
        config: &ChainConfig,
    ) -> TrustResult<Option<Triple>> {
        let data = self
            .executor
            .execute(
                QueryName::AccountTrustTriple,
                json!({
                    "subject": atom_id,
                    "predicate": config.predicates.is_predicate,
                    "object": config.predicates.trustworthy_object,
                }),
            )
            .await?;
        let parsed: TriplesResponse = serde_json::from_value(data)
            .map_err(|e| malformed(QueryName::AccountTrustTriple, e))?;
        Ok(parsed.triples.into_iter().next())
    }

    /// Object label of the highest-stake nickname triple, if any. Ordering by
    /// market cap descending happens in the query itself.
    async fn fetch_nickname(
        &self,
        atom_id: &str,
        config: &ChainConfig,
    ) -> TrustResult<Option<String>> {
        let data = self
            .executor
            .execute(
                QueryName::NicknameTriples,
                json!({
                    "subject": atom_id,
                    "predicate": config.predicates.nickname_predicate,
                }),
            )
            .await?;
        let parsed: NicknameResponse =
            serde_json::from_value(data).map_err(|e| malformed(QueryName::NicknameTriples, e))?;
        Ok(parsed.triples.into_iter().next().and_then(|row| row.object.label))
    }
}

fn malformed(name: QueryName, e: serde_json::Error) -> TrustError {
    TrustError::MalformedResponse {
        query: name.as_str().to_string(),
        reason: e.to_string(),
    }
}
