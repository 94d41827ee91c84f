#[cfg(test)]
#[path = "project_store_test.rs"]
mod tests;

use crate::domain::models::Message;
use crate::domain::models::PluginStatus;
use crate::domain::models::Project;

/// Client-side project state: the project list, the active project, the
/// active project's message sequence, and the last known plugin liveness.
/// Only one project's messages are ever held at a time.
#[derive(Default)]
pub struct ProjectStore {
    pub projects: Vec<Project>,
    pub current_project: Option<Project>,
    pub messages: Vec<Message>,
    pub is_loading: bool,
    pub plugin_status: PluginStatus,
}

impl ProjectStore {
    pub fn new() -> ProjectStore {
        return ProjectStore {
            projects: vec![],
            current_project: None,
            messages: vec![],
            is_loading: false,
            plugin_status: PluginStatus::default(),
        };
    }

    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects;
    }

    /// Newest first.
    pub fn add_project(&mut self, project: Project) {
        self.projects.insert(0, project);
    }

    /// Removes a project by id. When the removed project was active the
    /// active selection clears, but messages are left to the next
    /// `set_current_project` call.
    pub fn remove_project(&mut self, project_id: &str) {
        self.projects.retain(|project| return project.id != project_id);
        if self
            .current_project
            .as_ref()
            .is_some_and(|current| return current.id == project_id)
        {
            self.current_project = None;
        }
    }

    /// Switching projects always drops the message sequence so messages never
    /// leak across projects. Callers refetch afterwards.
    pub fn set_current_project(&mut self, project: Project) {
        self.current_project = Some(project);
        self.messages = vec![];
    }

    pub fn clear_current_project(&mut self) {
        self.current_project = None;
        self.messages = vec![];
    }

    pub fn set_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn add_messages(&mut self, messages: Vec<Message>) {
        self.messages.extend(messages);
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }

    pub fn set_plugin_status(&mut self, status: PluginStatus) {
        self.plugin_status = status;
    }
}
