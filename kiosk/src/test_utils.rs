//! In-memory gateway for controller and client tests.

use async_trait::async_trait;
use shared::{ApiRequest, ApiResponse, QuickMap, QuickMapEntry};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Replies with queued responses per action and records every request.
/// An action with nothing queued answers like an unreachable server.
#[derive(Default)]
pub struct MockGateway {
    responses: Mutex<HashMap<String, VecDeque<ApiResponse>>>,
    calls: Mutex<Vec<ApiRequest>>,
    held: Mutex<HashMap<String, Arc<Notify>>>,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, action: &str, response: ApiResponse) {
        self.responses
            .lock()
            .unwrap()
            .entry(action.to_string())
            .or_default()
            .push_back(response);
    }

    /// Calls to `action` wait until `release(action)`
    pub fn hold(&self, action: &str) {
        self.held
            .lock()
            .unwrap()
            .insert(action.to_string(), Arc::new(Notify::new()));
    }

    pub fn release(&self, action: &str) {
        if let Some(notify) = self.held.lock().unwrap().remove(action) {
            notify.notify_waiters();
            // Covers a call that has not reached its await yet
            notify.notify_one();
        }
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, action: &str) -> Vec<ApiRequest> {
        self.calls()
            .into_iter()
            .filter(|request| request.action() == action)
            .collect()
    }
}

#[async_trait]
impl crate::services::Gateway for MockGateway {
    async fn call(&self, _endpoint: &str, request: &ApiRequest) -> ApiResponse {
        self.calls.lock().unwrap().push(request.clone());

        let gate = self.held.lock().unwrap().get(request.action()).cloned();
        if let Some(notify) = gate {
            notify.notified().await;
        }

        self.responses
            .lock()
            .unwrap()
            .get_mut(request.action())
            .and_then(VecDeque::pop_front)
            .map(ApiResponse::classify)
            .unwrap_or_else(ApiResponse::transport_failure)
    }
}

/// `getQuickMap` reply holding the given `(id, name, points, last date)` rows
pub fn quick_map_response(rows: &[(&str, &str, u64, &str)]) -> ApiResponse {
    let map: QuickMap = rows
        .iter()
        .map(|(id, name, point, last_date)| {
            (
                id.to_string(),
                QuickMapEntry {
                    name: name.to_string(),
                    point: *point,
                    last_date: last_date.to_string(),
                    ..Default::default()
                },
            )
        })
        .collect();
    ApiResponse::ok().with_data(serde_json::to_value(map).unwrap())
}
