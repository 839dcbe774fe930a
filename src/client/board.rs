use super::{ClientError, TaskApi};
use crate::dto;
use tracing::debug;

/// Local mirror of the server's task list plus the progress of whatever the user is doing.
///
/// Nothing is changed before the server answers. Each action is split into a `begin_*` call,
/// made when the request is sent, and a `finish_*` call receiving the server's answer, so a
/// UI can keep rendering while requests are in flight. The async helpers ([TaskBoard::refresh],
/// [TaskBoard::add_task], [TaskBoard::toggle_task], [TaskBoard::delete_task]) do both halves
/// around a call to the [TaskApi].
pub struct TaskBoard<A> {
    api: A,
    tasks: Vec<dto::Task>,
    error: Option<String>,
    loading: bool,
    creating: bool,
    toggling: Option<i64>,
    deleting: Option<i64>,
}

impl<A: TaskApi> TaskBoard<A> {
    /// An empty board. Call [TaskBoard::refresh] to load the server's tasks.
    pub fn new(api: A) -> Self {
        TaskBoard {
            api,
            tasks: Vec::new(),
            error: None,
            loading: false,
            creating: false,
            toggling: None,
            deleting: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Tasks in the order the server listed them, newest first
    pub fn tasks(&self) -> &[dto::Task] {
        &self.tasks
    }

    /// Message describing the last failed action
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_creating(&self) -> bool {
        self.creating
    }

    /// ID of the task whose toggle is in flight
    pub fn toggling(&self) -> Option<i64> {
        self.toggling
    }

    /// ID of the task whose deletion is in flight
    pub fn deleting(&self) -> Option<i64> {
        self.deleting
    }

    /// Counts computed from the local list, without asking the server
    pub fn stats(&self) -> dto::TaskStats {
        let total_tasks = self.tasks.len() as i64;
        let completed_tasks = self.tasks.iter().filter(|task| task.completed).count() as i64;

        dto::TaskStats {
            total_tasks,
            completed_tasks,
            pending_tasks: total_tasks - completed_tasks,
        }
    }

    pub fn begin_refresh(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn finish_refresh(&mut self, result: Result<Vec<dto::Task>, ClientError>) {
        self.loading = false;
        match result {
            Ok(tasks) => self.tasks = tasks,
            Err(err) => self.record_failure("refresh", err),
        }
    }

    /// Returns false, changing nothing, when a create is already in flight
    pub fn begin_create(&mut self) -> bool {
        if self.creating {
            return false;
        }
        self.creating = true;
        self.error = None;
        true
    }

    pub fn finish_create(&mut self, result: Result<dto::Task, ClientError>) {
        self.creating = false;
        match result {
            Ok(task) => self.tasks.insert(0, task),
            Err(err) => self.record_failure("create", err),
        }
    }

    /// Returns false, changing nothing, when this task's toggle is already in flight
    pub fn begin_toggle(&mut self, task_id: i64) -> bool {
        if self.toggling == Some(task_id) {
            return false;
        }
        self.toggling = Some(task_id);
        self.error = None;
        true
    }

    pub fn finish_toggle(&mut self, task_id: i64, result: Result<dto::Task, ClientError>) {
        if self.toggling == Some(task_id) {
            self.toggling = None;
        }
        match result {
            Ok(toggled) => {
                if let Some(task) = self.tasks.iter_mut().find(|task| task.id == toggled.id) {
                    *task = toggled;
                }
            }
            Err(err) => self.record_failure("toggle", err),
        }
    }

    /// Returns false, changing nothing, when this task's deletion is already in flight
    pub fn begin_delete(&mut self, task_id: i64) -> bool {
        if self.deleting == Some(task_id) {
            return false;
        }
        self.deleting = Some(task_id);
        self.error = None;
        true
    }

    pub fn finish_delete(&mut self, task_id: i64, result: Result<(), ClientError>) {
        if self.deleting == Some(task_id) {
            self.deleting = None;
        }
        match result {
            Ok(()) => self.tasks.retain(|task| task.id != task_id),
            Err(err) => self.record_failure("delete", err),
        }
    }

    /// Replaces the local list with the server's
    pub async fn refresh(&mut self) {
        self.begin_refresh();
        let result = self.api.list_tasks().await;
        self.finish_refresh(result);
    }

    pub async fn add_task(&mut self, text: &str) {
        if !self.begin_create() {
            return;
        }
        let result = self.api.create_task(text).await;
        self.finish_create(result);
    }

    pub async fn toggle_task(&mut self, task_id: i64) {
        if !self.begin_toggle(task_id) {
            return;
        }
        let result = self.api.toggle_task(task_id).await;
        self.finish_toggle(task_id, result);
    }

    pub async fn delete_task(&mut self, task_id: i64) {
        if !self.begin_delete(task_id) {
            return;
        }
        let result = self.api.delete_task(task_id).await;
        self.finish_delete(task_id, result);
    }

    fn record_failure(&mut self, action: &str, err: ClientError) {
        debug!("Task {action} failed: {err:?}");
        self.error = Some(err.to_string());
    }
}
