// src/circle/resolver.rs
use crate::chains::ChainRegistry;
use crate::circle::cache::TrustedCircleCache;
use crate::error::{TrustError, TrustResult};
use crate::query::{QueryExecutor, QueryName};
use crate::types::{Atom, Position, TrustedContact, normalize_address, truncate_address};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct PositionsResponse {
    positions: Vec<PositionRow>,
}

#[derive(Debug, Deserialize)]
struct PositionRow {
    term: TermRow,
}

#[derive(Debug, Deserialize)]
struct TermRow {
    triple: Option<TripleSubjectRow>,
}

#[derive(Debug, Deserialize)]
struct TripleSubjectRow {
    subject: Atom,
}

/// Trusted contacts found on each side of a claim's position lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CircleMatches {
    pub supporters: Vec<TrustedContact>,
    pub opponents: Vec<TrustedContact>,
}

impl CircleMatches {
    pub fn is_empty(&self) -> bool {
        self.supporters.is_empty() && self.opponents.is_empty()
    }
}

/// Fetches a user's trusted circle (accounts they have backed on
/// is/trustworthy claims) with a cache-aside TTL cache, and cross-references
/// circle members against a claim's position lists.
pub struct TrustedCircleResolver {
    executor: Arc<dyn QueryExecutor>,
    cache: TrustedCircleCache,
    registry: ChainRegistry,
}

impl TrustedCircleResolver {
    pub fn new(
        executor: Arc<dyn QueryExecutor>,
        cache: TrustedCircleCache,
        registry: ChainRegistry,
    ) -> Self {
        Self {
            executor,
            cache,
            registry,
        }
    }

    /// The user's trusted circle, from cache when fresh. Returns an empty
    /// list (never an error) when the user has backed nobody; callers must
    /// not distinguish "no data" from "empty".
    pub async fn trusted_circle(
        &self,
        user_address: &str,
        chain: &str,
    ) -> TrustResult<Vec<TrustedContact>> {
        let config = self.registry.lookup(chain)?;
        let address = normalize_address(user_address);

        if let Some(contacts) = self.cache.get(&address).await {
            return Ok(contacts);
        }

        let data = self
            .executor
            .execute(
                QueryName::TrustedPositions,
                json!({
                    "address": address,
                    "predicate": config.predicates.is_predicate,
                    "object": config.predicates.trustworthy_object,
                }),
            )
            .await?;
        let parsed: PositionsResponse =
            serde_json::from_value(data).map_err(|e| TrustError::MalformedResponse {
                query: QueryName::TrustedPositions.as_str().to_string(),
                reason: e.to_string(),
            })?;

        // One contact per claim subject, however many positions back it.
        let mut seen = HashSet::new();
        let mut contacts = Vec::new();
        for row in parsed.positions {
            let Some(triple) = row.term.triple else {
                continue;
            };
            let subject = triple.subject;
            if !seen.insert(subject.term_id.clone()) {
                continue;
            }
            let account_id = subject.data.unwrap_or_else(|| subject.term_id.clone());
            let label = subject
                .label
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| truncate_address(&account_id));
            contacts.push(TrustedContact { account_id, label });
        }

        self.cache.set(&address, contacts.clone()).await;
        Ok(contacts)
    }

    /// Filter a claim's support and counter position lists down to trusted-
    /// circle members. Delegates to [`cross_reference`].
    pub fn cross_reference(
        &self,
        circle: &[TrustedContact],
        for_positions: &[Position],
        against_positions: &[Position],
    ) -> CircleMatches {
        cross_reference(circle, for_positions, against_positions)
    }

    pub fn cache(&self) -> &TrustedCircleCache {
        &self.cache
    }
}

/// Match positions against a trusted circle, case-insensitively on address.
///
/// Display label precedence, most authoritative first: the circle-recorded
/// label (possibly user-curated), the position's embedded account label, a
/// truncated address. The support and counter lists are filtered
/// independently; an account may appear on either side.
pub fn cross_reference(
    circle: &[TrustedContact],
    for_positions: &[Position],
    against_positions: &[Position],
) -> CircleMatches {
    let labels: HashMap<String, &str> = circle
        .iter()
        .map(|c| (normalize_address(&c.account_id), c.label.as_str()))
        .collect();

    let matched = |positions: &[Position]| -> Vec<TrustedContact> {
        positions
            .iter()
            .filter_map(|position| {
                let key = normalize_address(&position.account_id);
                let circle_label = labels.get(key.as_str())?;
                let label = if !circle_label.is_empty() {
                    circle_label.to_string()
                } else if let Some(embedded) =
                    position.account_label.as_deref().filter(|l| !l.is_empty())
                {
                    embedded.to_string()
                } else {
                    truncate_address(&position.account_id)
                };
                Some(TrustedContact {
                    account_id: position.account_id.clone(),
                    label,
                })
            })
            .collect()
    };

    CircleMatches {
        supporters: matched(for_positions),
        opponents: matched(against_positions),
    }
}
