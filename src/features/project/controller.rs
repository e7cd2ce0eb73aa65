//! Project Controller
//!
//! Saving, loading and listing projects, plus page snapshots.

use serde_json::Value;
use tracing::info;

use crate::app::entities::AppEntities;
use crate::constants::DEFAULT_PAGE_LIMIT;
use crate::domain::project::ProjectSaved;
use crate::error::{Error, Result};
use crate::features::surface_error;
use crate::i18n::tr;

/// Input page controller
pub struct ProjectController {
    entities: AppEntities,
}

impl ProjectController {
    /// Create a new controller
    pub fn new(entities: AppEntities) -> Self {
        Self { entities }
    }

    /// Persist the edited project
    ///
    /// An incomplete project is rejected before any request is made. On
    /// success the backend-assigned id is stored and the project is marked
    /// saved, unless it was edited while the request was in flight.
    pub async fn save(&self) -> Result<ProjectSaved> {
        let (data, revision) = {
            let project = self.entities.project.read();
            if !project.is_project_valid() {
                let err = Error::Invalid {
                    message: tr("project.invalid"),
                };
                self.entities.notify_error(tr("project.invalid"));
                return Err(err);
            }
            (project.current_project_data(), project.revision())
        };

        let saved = match self.entities.api.save_project(&data).await {
            Ok(saved) => saved,
            Err(e) => return Err(surface_error(&self.entities, "save_project", e)),
        };

        let clean = {
            let mut project = self.entities.project.write();
            project.assign_project_id(saved.project_id);
            project.mark_saved_at(revision)
        };
        info!(project_id = saved.project_id, clean, "Project saved");
        self.entities.notify_success(tr("project.saved"));
        Ok(saved)
    }

    /// Load a project into the editor
    pub async fn load(&self, project_id: i64) -> Result<()> {
        let data = match self.entities.api.get_project(project_id).await {
            Ok(data) => data,
            Err(e) => return Err(surface_error(&self.entities, "get_project", e)),
        };

        self.entities.project.write().set_project_data(data);
        info!(project_id, "Project loaded");
        self.entities.notify_success(tr("project.loaded"));
        Ok(())
    }

    /// One page of the project list
    pub async fn list(&self, page: u32) -> Result<Vec<Value>> {
        let offset = page.saturating_mul(DEFAULT_PAGE_LIMIT);
        self.entities
            .api
            .list_projects(DEFAULT_PAGE_LIMIT, offset)
            .await
            .map_err(|e| surface_error(&self.entities, "list_projects", e))
    }

    /// Remember the editor content for a page
    pub fn save_snapshot(&self, page_key: &str) {
        self.entities
            .project
            .read()
            .save_snapshot(self.entities.snapshots.as_ref(), page_key);
    }

    /// Bring back the editor content remembered for a page
    pub fn restore_snapshot(&self, page_key: &str) -> bool {
        self.entities
            .project
            .write()
            .restore_snapshot(self.entities.snapshots.as_ref(), page_key)
    }
}
