// src/query/graphql.rs
use crate::error::{TrustError, TrustResult};
use crate::query::{QueryExecutor, QueryName};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

const ACCOUNT_BY_ADDRESS: &str = r#"
query AccountByAddress($address: String!, $caip10: String!) {
  accounts(where: {id: {_in: [$address, $caip10]}}, limit: 1) {
    id
    atom_id
    label
  }
}"#;

const ACCOUNT_TRUST_TRIPLE: &str = r#"
query AccountTrustTriple($subject: String!, $predicate: String!, $object: String!) {
  triples(where: {subject_id: {_eq: $subject}, predicate_id: {_eq: $predicate}, object_id: {_eq: $object}}, limit: 1) {
    term_id
    subject_id
    predicate_id
    object_id
    vault { market_cap position_count positions { account_id account_label shares } }
    counter_vault { market_cap position_count positions { account_id account_label shares } }
  }
}"#;

const NICKNAME_TRIPLES: &str = r#"
query NicknameTriples($subject: String!, $predicate: String!) {
  triples(
    where: {subject_id: {_eq: $subject}, predicate_id: {_eq: $predicate}},
    order_by: {vault: {market_cap: desc}},
    limit: 1
  ) {
    term_id
    object { term_id label image }
  }
}"#;

const ORIGIN_ATOM: &str = r#"
query OriginAtom($value: String!) {
  atoms(where: {data: {_eq: $value}}, limit: 1) {
    term_id
    label
    image
    data
  }
}"#;

const ORIGIN_TAG_TRIPLE: &str = r#"
query OriginTagTriple($subject: String!, $predicate: String!, $object: String!) {
  triples(where: {subject_id: {_eq: $subject}, predicate_id: {_eq: $predicate}, object_id: {_eq: $object}}, limit: 1) {
    term_id
    subject_id
    predicate_id
    object_id
    vault { market_cap position_count positions { account_id account_label shares } }
    counter_vault { market_cap position_count positions { account_id account_label shares } }
  }
}"#;

const TRUSTED_POSITIONS: &str = r#"
query TrustedPositions($address: String!, $predicate: String!, $object: String!) {
  positions(where: {
    account_id: {_eq: $address},
    term: {triple: {predicate_id: {_eq: $predicate}, object_id: {_eq: $object}}}
  }) {
    shares
    term {
      triple {
        subject { term_id label data }
      }
    }
  }
}"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Query Executor backed by a GraphQL endpoint over HTTP. One POST per call,
/// no retries; timeouts are left to the client's transport defaults.
#[derive(Clone)]
pub struct GraphQlExecutor {
    client: Client,
    endpoint: String,
}

impl GraphQlExecutor {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    pub fn with_client(endpoint: String, client: Client) -> Self {
        Self { client, endpoint }
    }

    fn document(name: QueryName) -> &'static str {
        match name {
            QueryName::AccountByAddress => ACCOUNT_BY_ADDRESS,
            QueryName::AccountTrustTriple => ACCOUNT_TRUST_TRIPLE,
            QueryName::NicknameTriples => NICKNAME_TRIPLES,
            QueryName::OriginAtom => ORIGIN_ATOM,
            QueryName::OriginTagTriple => ORIGIN_TAG_TRIPLE,
            QueryName::TrustedPositions => TRUSTED_POSITIONS,
        }
    }

    fn failure(name: QueryName, reason: impl Into<String>) -> TrustError {
        TrustError::QueryFailure {
            query: name.as_str().to_string(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl QueryExecutor for GraphQlExecutor {
    async fn execute(&self, name: QueryName, variables: Value) -> TrustResult<Value> {
        let body = json!({
            "query": Self::document(name),
            "variables": variables,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::failure(name, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::failure(name, format!("HTTP {}", status)));
        }

        let parsed: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| Self::failure(name, e.to_string()))?;

        if let Some(errors) = parsed.errors {
            let messages = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(Self::failure(name, messages));
        }

        parsed
            .data
            .ok_or_else(|| Self::failure(name, "response carried no data"))
    }
}
