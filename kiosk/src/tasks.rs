//! # Background Tasks
//!
//! Fire-and-forget work (write-behind saves, roster refreshes, history
//! fetches) runs on spawned tokio tasks. Each task reports back exactly once
//! with a [`Completion`] on an unbounded channel; the controller applies
//! completions in arrival order on its own task, so nothing else ever
//! touches the kiosk state.
//!
//! ## Scopes:
//! - `Persistent`: writes and refreshes. Never aborted.
//! - `View(generation)`: work that only matters to the screen that asked
//!   for it. Aborted when the screen changes.

use log::{debug, info};
use shared::ApiResponse;
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::domain::{AwardSnapshot, CheckinSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    Persistent,
    View(u64),
}

/// Result of one background task
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionEvent {
    CheckinSaved {
        id: String,
        snapshot: CheckinSnapshot,
        response: ApiResponse,
    },
    PointsSaved {
        id: String,
        snapshot: AwardSnapshot,
        response: ApiResponse,
    },
    RosterRefreshed {
        response: ApiResponse,
    },
    HistoryLoaded {
        student_id: String,
        year: i32,
        response: ApiResponse,
    },
    RemoteSearch {
        query: String,
        response: ApiResponse,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub task_id: Uuid,
    pub scope: TaskScope,
    pub event: CompletionEvent,
}

pub struct TaskTracker {
    tasks: HashMap<Uuid, (TaskScope, JoinHandle<()>)>,
    sender: UnboundedSender<Completion>,
}

impl TaskTracker {
    pub fn new() -> (Self, UnboundedReceiver<Completion>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let tracker = Self {
            tasks: HashMap::new(),
            sender,
        };
        (tracker, receiver)
    }

    pub fn spawn<F>(&mut self, scope: TaskScope, work: F) -> Uuid
    where
        F: Future<Output = CompletionEvent> + Send + 'static,
    {
        let task_id = Uuid::new_v4();
        let sender = self.sender.clone();

        let handle = tokio::spawn(async move {
            let event = work.await;
            // The receiver is only gone during shutdown
            let _ = sender.send(Completion {
                task_id,
                scope,
                event,
            });
        });

        debug!("🧵 Spawned task {} ({:?})", task_id, scope);
        self.tasks.insert(task_id, (scope, handle));
        task_id
    }

    /// Forget a task whose completion has been received
    pub fn finish(&mut self, task_id: Uuid) -> bool {
        self.tasks.remove(&task_id).is_some()
    }

    /// Abort every view-scoped task. Returns how many were aborted.
    pub fn cancel_view_tasks(&mut self) -> usize {
        let view_tasks: Vec<Uuid> = self
            .tasks
            .iter()
            .filter(|(_, (scope, _))| matches!(scope, TaskScope::View(_)))
            .map(|(id, _)| *id)
            .collect();

        for task_id in &view_tasks {
            if let Some((_, handle)) = self.tasks.remove(task_id) {
                handle.abort();
            }
        }

        if !view_tasks.is_empty() {
            info!("🛑 Cancelled {} view task(s)", view_tasks.len());
        }
        view_tasks.len()
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(test)]
    pub fn is_pending(&self, task_id: Uuid) -> bool {
        self.tasks.contains_key(&task_id)
    }
}
