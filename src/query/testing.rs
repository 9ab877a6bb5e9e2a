// src/query/testing.rs
//! In-memory fakes for the query seams, shared by unit tests across modules.

use crate::error::{TrustError, TrustResult};
use crate::query::{CodeProvider, QueryExecutor, QueryName};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

enum Canned {
    Ok(Value),
    Err(String),
}

type Log = Arc<Mutex<Vec<(QueryName, Value)>>>;

/// Names of the queries a fake executor has served, in order.
#[derive(Clone)]
pub struct CallLog(Log);

impl CallLog {
    pub fn snapshot(&self) -> Vec<QueryName> {
        self.0.lock().unwrap().iter().map(|(n, _)| *n).collect()
    }

    pub fn count(&self, name: QueryName) -> usize {
        self.0.lock().unwrap().iter().filter(|(n, _)| *n == name).count()
    }
}

/// Full (name, variables) pairs a fake executor has served, in order.
#[derive(Clone)]
pub struct VariableLog(Log);

impl VariableLog {
    pub fn snapshot(&self) -> Vec<(QueryName, Value)> {
        self.0.lock().unwrap().clone()
    }
}

/// Query Executor that serves canned responses and records every call.
pub struct FakeExecutor {
    responses: HashMap<QueryName, Canned>,
    log: Log,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(mut self, name: QueryName, data: Value) -> Self {
        self.responses.insert(name, Canned::Ok(data));
        self
    }

    pub fn with_failure(mut self, name: QueryName, reason: &str) -> Self {
        self.responses.insert(name, Canned::Err(reason.to_string()));
        self
    }

    pub fn calls(&self) -> CallLog {
        CallLog(Arc::clone(&self.log))
    }

    pub fn variables(&self) -> VariableLog {
        VariableLog(Arc::clone(&self.log))
    }
}

#[async_trait]
impl QueryExecutor for FakeExecutor {
    async fn execute(&self, name: QueryName, variables: Value) -> TrustResult<Value> {
        self.log.lock().unwrap().push((name, variables));
        match self.responses.get(&name) {
            Some(Canned::Ok(data)) => Ok(data.clone()),
            Some(Canned::Err(reason)) => Err(TrustError::QueryFailure {
                query: name.as_str().to_string(),
                reason: reason.clone(),
            }),
            None => Err(TrustError::QueryFailure {
                query: name.as_str().to_string(),
                reason: "no canned response".to_string(),
            }),
        }
    }
}

/// Code provider with a fixed contract-vs-EOA answer.
pub struct FakeCodeProvider {
    is_contract: bool,
}

impl FakeCodeProvider {
    pub fn new(is_contract: bool) -> Self {
        Self { is_contract }
    }
}

#[async_trait]
impl CodeProvider for FakeCodeProvider {
    async fn get_code(&self, _rpc_url: &str, _address: &str) -> TrustResult<String> {
        Ok(if self.is_contract {
            "0x6080604052".to_string()
        } else {
            "0x".to_string()
        })
    }
}
