use log::{error, info};
use shared::{ApiRequest, ApiResponse, StudentRecord, CONNECTION_ERROR_MESSAGE};
use uuid::Uuid;

use super::KioskController;
use crate::error::{KioskError, KioskResult};
use crate::tasks::{CompletionEvent, TaskScope};

impl KioskController {
    /// Replace the roster with a fresh quick map, with the loader up
    pub async fn refresh(&mut self) -> KioskResult<usize> {
        let response = self.api.call(ApiRequest::GetQuickMap, true).await;
        self.apply_roster(&response)
    }

    /// Refresh without blocking input
    pub fn spawn_refresh(&mut self) -> Uuid {
        let api = self.api.clone();
        self.tasks.spawn(TaskScope::Persistent, async move {
            let response = api.call(ApiRequest::GetQuickMap, false).await;
            CompletionEvent::RosterRefreshed { response }
        })
    }

    /// A failed refresh leaves the previous roster untouched
    pub(super) fn apply_roster(&mut self, response: &ApiResponse) -> KioskResult<usize> {
        if !response.success {
            return Err(self.fail(response));
        }

        let map = response.quick_map().map_err(|e| {
            error!("Failed to decode quick map: {}", e);
            KioskError::Backend(CONNECTION_ERROR_MESSAGE.to_string())
        })?;
        self.state.roster.replace(map);

        let count = self.state.roster.len();
        info!("👥 Roster refreshed: {} students", count);
        Ok(count)
    }

    /// Sheet headers, fetched once and then served from memory
    pub async fn ensure_schema(&mut self) -> KioskResult<Vec<String>> {
        if !self.state.schema_headers.is_empty() {
            return Ok(self.state.schema_headers.clone());
        }

        let response = self.api.call(ApiRequest::GetSchema, true).await;
        if !response.success {
            return Err(self.fail(&response));
        }

        let headers = response.headers().unwrap_or_default();
        info!("📋 Sheet headers: {:?}", headers);
        self.state.schema_headers = headers.clone();
        Ok(headers)
    }

    /// Local search over the cached roster
    pub fn search(&mut self, query: &str) -> Vec<StudentRecord> {
        let results = self.state.roster.search(query);
        self.state.results = results.clone();
        self.state.selected = None;
        results
    }

    /// Ask the backend to search by name; the answer arrives as a completion
    pub fn search_remote(&mut self, query: &str) -> KioskResult<Uuid> {
        let query = query.trim().to_string();
        if query.is_empty() {
            return Err(KioskError::MissingField("이름".to_string()));
        }

        let api = self.api.clone();
        let request = ApiRequest::SearchName {
            name: query.clone(),
        };
        let scope = TaskScope::View(self.state.generation);
        Ok(self.tasks.spawn(scope, async move {
            let response = api.call(request, false).await;
            CompletionEvent::RemoteSearch { query, response }
        }))
    }

    /// Exact card lookup from the reader; the student becomes the selection
    pub fn lookup_card(&mut self, id: &str) -> KioskResult<StudentRecord> {
        let record = self
            .state
            .roster
            .find_by_card(id)
            .ok_or_else(|| KioskError::UnknownStudent(id.trim().to_string()))?;

        self.state.results = vec![record.clone()];
        self.state.selected = Some(record.id.clone());
        Ok(record)
    }
}
