// src/resolver/origin.rs
use crate::chains::{ChainConfig, ChainRegistry};
use crate::error::{TrustError, TrustResult};
use crate::query::{QueryExecutor, QueryName};
use crate::types::{Atom, OriginTrustData, Triple};
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct AtomsResponse {
    atoms: Vec<Atom>,
}

#[derive(Debug, Deserialize)]
struct TriplesResponse {
    triples: Vec<Triple>,
}

/// Resolves the trust state of a dApp origin: atom existence (by full URL,
/// falling back to bare hostname) and the has-tag/trustworthy triple.
///
/// Unlike address resolution, a trust-triple failure here is downgraded to
/// "no triple": the origin's existence is independently useful and must never
/// block transaction-insight rendering.
pub struct OriginResolver {
    executor: Arc<dyn QueryExecutor>,
    registry: ChainRegistry,
}

impl OriginResolver {
    pub fn new(executor: Arc<dyn QueryExecutor>, registry: ChainRegistry) -> Self {
        Self { executor, registry }
    }

    pub async fn resolve(
        &self,
        origin_url: Option<&str>,
        chain: &str,
    ) -> TrustResult<OriginTrustData> {
        let config = self.registry.lookup(chain)?;

        let Some(origin_url) = origin_url.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(OriginTrustData::absent());
        };
        let Some(hostname) = extract_hostname(origin_url) else {
            return Ok(OriginTrustData::absent());
        };

        // Some origins are registered by hostname only, not full URL.
        let mut atom = self.fetch_atom(origin_url).await?;
        if atom.is_none() && hostname != origin_url {
            atom = self.fetch_atom(&hostname).await?;
        }

        let Some(atom) = atom else {
            return Ok(OriginTrustData {
                origin: None,
                triple: None,
                hostname: Some(hostname),
            });
        };

        let triple = match self.fetch_tag_triple(&atom.term_id, config).await {
            Ok(triple) => triple,
            Err(e) => {
                tracing::warn!(
                    category = e.category(),
                    error = %e,
                    origin = origin_url,
                    "origin trust triple fetch failed, reporting atom without trust data"
                );
                None
            }
        };

        Ok(OriginTrustData {
            origin: Some(atom),
            triple,
            hostname: Some(hostname),
        })
    }

    async fn fetch_atom(&self, value: &str) -> TrustResult<Option<Atom>> {
        let data = self
            .executor
            .execute(QueryName::OriginAtom, json!({ "value": value }))
            .await?;
        let parsed: AtomsResponse = serde_json::from_value(data).map_err(|e| {
            TrustError::MalformedResponse {
                query: QueryName::OriginAtom.as_str().to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(parsed.atoms.into_iter().next())
    }

    async fn fetch_tag_triple(
        &self,
        atom_id: &str,
        config: &ChainConfig,
    ) -> TrustResult<Option<Triple>> {
        let data = self
            .executor
            .execute(
                QueryName::OriginTagTriple,
                json!({
                    "subject": atom_id,
                    "predicate": config.predicates.tag_predicate,
                    "object": config.predicates.trustworthy_object,
                }),
            )
            .await?;
        let parsed: TriplesResponse = serde_json::from_value(data).map_err(|e| {
            TrustError::MalformedResponse {
                query: QueryName::OriginTagTriple.as_str().to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(parsed.triples.into_iter().next())
    }
}

/// Extract a hostname from an origin URL. Falls back to taking everything
/// before the first `/` after stripping any protocol prefix, for values that
/// are not parseable URLs.
pub fn extract_hostname(origin_url: &str) -> Option<String> {
    if let Ok(url) = Url::parse(origin_url) {
        if let Some(host) = url.host_str() {
            return Some(host.to_string());
        }
    }

    let stripped = origin_url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(origin_url);
    let host = stripped.split('/').next().unwrap_or("");
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::testing::FakeExecutor;

    fn atom_response(term_id: &str, label: &str) -> serde_json::Value {
        json!({"atoms": [{"term_id": term_id, "label": label, "image": null}]})
    }

    fn tag_triple_response() -> serde_json::Value {
        json!({"triples": [{
            "term_id": "500",
            "subject_id": "40",
            "predicate_id": "25273",
            "object_id": "98822",
            "vault": {"market_cap": "2000000000000000000", "position_count": 2, "positions": []},
            "counter_vault": {"market_cap": "0", "position_count": 0, "positions": []}
        }]})
    }

    fn resolver(executor: FakeExecutor) -> OriginResolver {
        OriginResolver::new(Arc::new(executor), ChainRegistry::default())
    }

    #[test]
    fn test_extract_hostname() {
        assert_eq!(
            extract_hostname("https://app.uniswap.org/swap").as_deref(),
            Some("app.uniswap.org")
        );
        assert_eq!(
            extract_hostname("app.uniswap.org/swap").as_deref(),
            Some("app.uniswap.org")
        );
        assert_eq!(
            extract_hostname("wss://relay.example/path").as_deref(),
            Some("relay.example")
        );
        // The WHATWG parser collapses extra slashes after a special scheme
        assert_eq!(
            extract_hostname("https:///nohost").as_deref(),
            Some("nohost")
        );
        assert_eq!(extract_hostname("https://"), None);
        assert_eq!(extract_hostname("/swap"), None);
    }

    #[tokio::test]
    async fn test_no_origin_url_short_circuits() {
        let executor = FakeExecutor::new();
        let calls = executor.calls();
        let resolver = resolver(executor);

        let data = resolver.resolve(None, "8453").await.unwrap();
        assert!(data.origin.is_none());
        assert!(data.hostname.is_none());
        assert!(calls.snapshot().is_empty());

        let data = resolver.resolve(Some("  "), "8453").await.unwrap();
        assert!(data.origin.is_none());
    }

    #[tokio::test]
    async fn test_hostname_fallback_lookup() {
        // Full-URL lookup misses; hostname lookup hits.
        let executor = FakeExecutor::new()
            .with_response(QueryName::OriginAtom, json!({"atoms": []}))
            .with_response(QueryName::OriginTagTriple, json!({"triples": []}));
        let vars = executor.variables();
        let resolver = resolver(executor);

        let data = resolver
            .resolve(Some("https://app.uniswap.org/swap"), "8453")
            .await
            .unwrap();
        assert!(data.origin.is_none());
        assert_eq!(data.hostname.as_deref(), Some("app.uniswap.org"));

        let issued = vars.snapshot();
        let atom_lookups: Vec<_> = issued
            .iter()
            .filter(|(n, _)| *n == QueryName::OriginAtom)
            .map(|(_, v)| v["value"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            atom_lookups,
            vec!["https://app.uniswap.org/swap", "app.uniswap.org"]
        );
    }

    #[tokio::test]
    async fn test_atom_with_trust_triple() {
        let executor = FakeExecutor::new()
            .with_response(QueryName::OriginAtom, atom_response("40", "Uniswap"))
            .with_response(QueryName::OriginTagTriple, tag_triple_response());
        let resolver = resolver(executor);

        let data = resolver
            .resolve(Some("https://app.uniswap.org"), "8453")
            .await
            .unwrap();
        assert_eq!(data.origin.as_ref().unwrap().term_id, "40");
        assert!(data.triple.is_some());
    }

    #[tokio::test]
    async fn test_triple_failure_downgraded_to_absent() {
        let executor = FakeExecutor::new()
            .with_response(QueryName::OriginAtom, atom_response("40", "Uniswap"))
            .with_failure(QueryName::OriginTagTriple, "upstream 502");
        let resolver = resolver(executor);

        let data = resolver
            .resolve(Some("https://app.uniswap.org"), "8453")
            .await
            .unwrap();
        // Atom still reported even though the trust fetch failed
        assert!(data.origin.is_some());
        assert!(data.triple.is_none());
    }

    #[tokio::test]
    async fn test_atom_lookup_failure_propagates() {
        let executor =
            FakeExecutor::new().with_failure(QueryName::OriginAtom, "connection refused");
        let resolver = resolver(executor);

        let err = resolver
            .resolve(Some("https://app.uniswap.org"), "8453")
            .await
            .unwrap_err();
        assert!(matches!(err, TrustError::QueryFailure { .. }));
    }
}
