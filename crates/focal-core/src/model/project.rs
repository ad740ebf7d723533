use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::Id;

/// A project groups tasks under a shared goal. Tasks hold a weak reference
/// (`Task::project_id`); deleting a project nulls those references, it never
/// deletes tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: Id,
    pub name: String,
    pub color: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            id: Id::generate(),
            name: String::new(),
            color: String::new(),
            description: String::new(),
            created_at: DateTime::UNIX_EPOCH,
            updated_at: DateTime::UNIX_EPOCH,
        }
    }
}

impl Project {
    #[must_use]
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Id::generate(),
            name: name.into(),
            created_at: now,
            updated_at: now,
            ..Self::default()
        }
    }

    /// The quick-capture slug for this project: name lowercased, spaces
    /// replaced with hyphens.
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

/// A flat label applied to tasks. Weak-referenced from `Task::category_ids`;
/// deleting a category filters its id out of every task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    pub id: Id,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Category {
    fn default() -> Self {
        Self {
            id: Id::generate(),
            name: String::new(),
            color: String::new(),
            created_at: DateTime::UNIX_EPOCH,
            updated_at: DateTime::UNIX_EPOCH,
        }
    }
}

impl Category {
    #[must_use]
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Id::generate(),
            name: name.into(),
            created_at: now,
            updated_at: now,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

/// Slug rule shared by quick-capture matching: lowercase the name and
/// replace spaces with hyphens. Nothing else is normalized.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_lowercases_and_hyphenates() {
        assert_eq!(slugify("Deep Work"), "deep-work");
        assert_eq!(slugify("Errands"), "errands");
        assert_eq!(slugify("Side  Project"), "side--project");
    }

    #[test]
    fn project_slug_uses_name() {
        let p = Project::new("Home Renovation", Utc::now());
        assert_eq!(p.slug(), "home-renovation");
    }
}
