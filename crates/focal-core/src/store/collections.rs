//! Project and category mutations.
//!
//! Both are weak-reference targets: deletion scrubs every referencing task
//! before the entity itself is removed, so no task retains a dangling
//! reference after the call returns.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::Store;
use crate::error::{CoreError, EntityKind};
use crate::model::{Category, Id, Project};

impl Store {
    /// Create a project.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty name.
    pub fn create_project(
        &mut self,
        name: &str,
        color: &str,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<Project, CoreError> {
        self.undo_mut().prune(now);

        if name.trim().is_empty() {
            return Err(CoreError::Validation("project name must not be empty".into()));
        }
        let mut project = Project::new(name, now);
        project.color = color.to_string();
        project.description = description.to_string();
        self.data_mut().projects.push(project.clone());
        debug!(id = %project.id, "project created");
        Ok(project)
    }

    /// Replace the stored project matching `updated.id`, refreshing
    /// `updated_at`.
    ///
    /// # Errors
    ///
    /// `NotFound` when no project has that id; `Validation` for an empty name.
    pub fn update_project(
        &mut self,
        updated: Project,
        now: DateTime<Utc>,
    ) -> Result<Project, CoreError> {
        self.undo_mut().prune(now);

        if updated.name.trim().is_empty() {
            return Err(CoreError::Validation("project name must not be empty".into()));
        }
        let id = updated.id;
        let stored = self
            .data_mut()
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Project, id))?;
        let created_at = stored.created_at;
        *stored = updated;
        stored.created_at = created_at;
        stored.updated_at = now;
        Ok(stored.clone())
    }

    /// Delete a project, nulling `project_id` on every referencing task
    /// first. Total: no task keeps a dangling reference.
    ///
    /// # Errors
    ///
    /// `NotFound` when no project has that id.
    pub fn delete_project(&mut self, id: Id, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.undo_mut().prune(now);

        if self.project(id).is_none() {
            return Err(CoreError::not_found(EntityKind::Project, id));
        }

        let mut scrubbed = 0;
        for task in &mut self.data_mut().tasks {
            if task.project_id == Some(id) {
                task.project_id = None;
                task.updated_at = now;
                scrubbed += 1;
            }
        }
        self.data_mut().projects.retain(|p| p.id != id);
        debug!(id = %id, scrubbed, "project deleted");
        Ok(())
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty name.
    pub fn create_category(
        &mut self,
        name: &str,
        color: &str,
        now: DateTime<Utc>,
    ) -> Result<Category, CoreError> {
        self.undo_mut().prune(now);

        if name.trim().is_empty() {
            return Err(CoreError::Validation("category name must not be empty".into()));
        }
        let mut category = Category::new(name, now);
        category.color = color.to_string();
        self.data_mut().categories.push(category.clone());
        debug!(id = %category.id, "category created");
        Ok(category)
    }

    /// Replace the stored category matching `updated.id`.
    ///
    /// # Errors
    ///
    /// `NotFound` when no category has that id; `Validation` for an empty name.
    pub fn update_category(
        &mut self,
        updated: Category,
        now: DateTime<Utc>,
    ) -> Result<Category, CoreError> {
        self.undo_mut().prune(now);

        if updated.name.trim().is_empty() {
            return Err(CoreError::Validation("category name must not be empty".into()));
        }
        let id = updated.id;
        let stored = self
            .data_mut()
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Category, id))?;
        let created_at = stored.created_at;
        *stored = updated;
        stored.created_at = created_at;
        stored.updated_at = now;
        Ok(stored.clone())
    }

    /// Delete a category, filtering it out of every task's `category_ids`
    /// first. Total: no task keeps a dangling reference.
    ///
    /// # Errors
    ///
    /// `NotFound` when no category has that id.
    pub fn delete_category(&mut self, id: Id, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.undo_mut().prune(now);

        if self.category(id).is_none() {
            return Err(CoreError::not_found(EntityKind::Category, id));
        }

        let mut scrubbed = 0;
        for task in &mut self.data_mut().tasks {
            let before = task.category_ids.len();
            task.category_ids.retain(|&c| c != id);
            if task.category_ids.len() != before {
                task.updated_at = now;
                scrubbed += 1;
            }
        }
        self.data_mut().categories.retain(|c| c.id != id);
        debug!(id = %id, scrubbed, "category deleted");
        Ok(())
    }

    /// Find a project by its quick-capture slug.
    #[must_use]
    pub fn project_by_slug(&self, slug: &str) -> Option<&Project> {
        self.projects().iter().find(|p| p.slug() == slug)
    }

    /// Find a category by its quick-capture slug.
    #[must_use]
    pub fn category_by_slug(&self, slug: &str) -> Option<&Category> {
        self.categories().iter().find(|c| c.slug() == slug)
    }
}
