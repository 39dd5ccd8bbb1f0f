//! Scripted transport for service tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::config::LocaleSettings;
use crate::error::BridgeError;
use crate::shopify::queries::Operation;
use crate::shopify::{GraphQLRequest, GraphQLTransport};

#[derive(Debug, Clone)]
enum Reply {
    Data(Value),
    Fail(String),
}

/// Answers each operation from a queue of scripted replies.
///
/// The last reply of a queue is repeated once the queue is drained.
#[derive(Debug, Default)]
pub struct FakeTransport {
    replies: Mutex<HashMap<&'static str, VecDeque<Reply>>>,
    calls: Mutex<Vec<GraphQLRequest>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a `data` object for `operation`.
    pub fn reply(&self, operation: &Operation, data: Value) -> &Self {
        self.push(operation, Reply::Data(data))
    }

    /// Queue a transport failure for `operation`.
    pub fn fail(&self, operation: &Operation, message: &str) -> &Self {
        self.push(operation, Reply::Fail(message.to_string()))
    }

    fn push(&self, operation: &Operation, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(operation.name)
            .or_default()
            .push_back(reply);
        self
    }

    /// Every request received, in order.
    pub fn calls(&self) -> Vec<GraphQLRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Requests received for `operation`.
    pub fn calls_to(&self, operation: &Operation) -> Vec<GraphQLRequest> {
        self.calls()
            .into_iter()
            .filter(|call| call.operation_name == operation.name)
            .collect()
    }
}

#[async_trait]
impl GraphQLTransport for FakeTransport {
    async fn post(&self, request: &GraphQLRequest) -> Result<Value, BridgeError> {
        self.calls.lock().unwrap().push(request.clone());

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            let queue = replies.get_mut(request.operation_name);
            match queue {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Data(data)) => Ok(data),
            Some(Reply::Fail(body)) => Err(BridgeError::Status { status: 503, body }),
            None => Err(BridgeError::Status {
                status: 500,
                body: format!("no scripted reply for {}", request.operation_name),
            }),
        }
    }
}

pub fn settings() -> Arc<LocaleSettings> {
    Arc::new(
        LocaleSettings::new("en")
            .with_language_map(HashMap::from([("de".to_string(), "de-de".to_string())])),
    )
}

/// A connection of `nodes` as the backend returns it.
pub fn connection(root: &str, nodes: Vec<Value>, end_cursor: Option<&str>, has_next_page: bool) -> Value {
    let edges: Vec<Value> = nodes
        .into_iter()
        .map(|node| serde_json::json!({ "node": node }))
        .collect();
    serde_json::json!({
        root: {
            "edges": edges,
            "pageInfo": { "hasNextPage": has_next_page, "endCursor": end_cursor }
        }
    })
}

/// `{root: {count}}` as returned by a count query.
pub fn count(root: &str, count: u64) -> Value {
    serde_json::json!({ root: { "count": count } })
}
