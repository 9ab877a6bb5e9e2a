// src/lib.rs
pub mod actions;
pub mod chains;
pub mod circle;
pub mod classify;
pub mod error;
pub mod query;
pub mod resolver;
pub mod types;
pub mod units;

use crate::actions::{
    AccountActionContext, Action, OriginActionContext, select_transaction_actions,
};
use crate::chains::ChainRegistry;
use crate::circle::{CircleMatches, KeyValueStore, TrustedCircleCache, TrustedCircleResolver};
use crate::classify::{AccountState, OriginState, classify_account, classify_origin};
use crate::error::TrustResult;
use crate::query::{CodeProvider, GraphQlExecutor, JsonRpcCodeProvider, QueryExecutor};
use crate::resolver::{AccountResolver, OriginResolver};
use crate::types::{AccountTrustData, OriginTrustData, Triple};
use std::sync::Arc;

/// One pending transaction to inspect.
#[derive(Debug, Clone)]
pub struct InsightRequest {
    /// Chain reference in any accepted encoding (numeric, eip155, caip10)
    pub chain: String,
    /// Destination address of the pending transaction
    pub to_address: String,
    /// dApp origin the transaction came from, when known
    pub origin_url: Option<String>,
    /// The acting user's own address
    pub user_address: String,
    /// Wallet-local petname already stored for the destination, if any
    pub alias: Option<String>,
}

/// Resolved trust state plus the calls-to-action to surface for it.
#[derive(Debug, Clone)]
pub struct TransactionInsight {
    pub account: AccountTrustData,
    pub account_state: AccountState,
    pub origin: OriginTrustData,
    pub origin_state: OriginState,
    pub actions: Vec<Action>,
    /// Trusted-circle members found on the account trust claim's position
    /// lists. Display-only side channel; absent when the circle is empty or
    /// could not be fetched.
    pub circle_matches: Option<CircleMatches>,
}

/// Main trust resolution service: resolves the trust state of a pending
/// transaction's destination address and dApp origin against the knowledge
/// graph and selects the actions to surface.
pub struct TrustInsight {
    account_resolver: AccountResolver,
    origin_resolver: OriginResolver,
    circle: TrustedCircleResolver,
}

impl TrustInsight {
    pub fn new(
        executor: Arc<dyn QueryExecutor>,
        code: Arc<dyn CodeProvider>,
        store: Arc<dyn KeyValueStore>,
        registry: ChainRegistry,
    ) -> Self {
        let cache = TrustedCircleCache::new(store);
        Self {
            account_resolver: AccountResolver::new(
                Arc::clone(&executor),
                code,
                registry.clone(),
            ),
            origin_resolver: OriginResolver::new(Arc::clone(&executor), registry.clone()),
            circle: TrustedCircleResolver::new(executor, cache, registry),
        }
    }

    /// Wire up the default registry, GraphQL executor and JSON-RPC code
    /// provider for one chain.
    pub fn connect(chain: &str, store: Arc<dyn KeyValueStore>) -> TrustResult<Self> {
        let registry = ChainRegistry::default();
        let config = registry.lookup(chain)?;
        let executor: Arc<dyn QueryExecutor> =
            Arc::new(GraphQlExecutor::new(config.graph_endpoint.clone()));
        let code: Arc<dyn CodeProvider> = Arc::new(JsonRpcCodeProvider::new());
        Ok(Self::new(executor, code, store, registry))
    }

    /// Resolve, classify, and select actions for one pending transaction.
    ///
    /// A failed account resolution fails the whole insight. A failed origin
    /// trust-triple fetch still yields the atom-only origin state. The
    /// trusted-circle side channel is advisory and never fails the insight.
    pub async fn inspect(&self, request: &InsightRequest) -> TrustResult<TransactionInsight> {
        let account = self
            .account_resolver
            .resolve(&request.to_address, &request.chain)
            .await?;
        let origin = self
            .origin_resolver
            .resolve(request.origin_url.as_deref(), &request.chain)
            .await?;

        // An origin URL only counts as provided when a hostname could be
        // extracted from it; a hostless input classifies as NoOrigin.
        let origin_url_provided = origin.hostname.is_some();
        let account_state = classify_account(&account);
        let origin_state = classify_origin(&origin, origin_url_provided);

        let account_ctx = AccountActionContext {
            state: account_state,
            data: &account,
            user_address: &request.user_address,
            has_alias: request.alias.is_some(),
        };
        let origin_ctx = OriginActionContext {
            state: origin_state,
            data: &origin,
            user_address: &request.user_address,
        };
        let actions = select_transaction_actions(&account_ctx, &origin_ctx);

        let circle_matches = match &account.triple {
            Some(triple) => self.match_circle(request, triple).await,
            None => None,
        };

        Ok(TransactionInsight {
            account,
            account_state,
            origin,
            origin_state,
            actions,
            circle_matches,
        })
    }

    async fn match_circle(
        &self,
        request: &InsightRequest,
        triple: &Triple,
    ) -> Option<CircleMatches> {
        let circle = match self
            .circle
            .trusted_circle(&request.user_address, &request.chain)
            .await
        {
            Ok(circle) => circle,
            Err(e) => {
                tracing::warn!(
                    category = e.category(),
                    error = %e,
                    "trusted circle fetch failed, omitting side channel"
                );
                return None;
            }
        };
        if circle.is_empty() {
            return None;
        }
        let matches =
            self.circle
                .cross_reference(&circle, triple.positions(), triple.counter_positions());
        (!matches.is_empty()).then_some(matches)
    }

    /// Drop one user's cached trusted circle, or every user's.
    pub async fn clear_trusted_circle(&self, user_address: Option<&str>) {
        self.circle.cache().clear(user_address).await;
    }
}
