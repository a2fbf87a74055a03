use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::config::ProjectRecord;

#[derive(Debug, PartialEq)]
pub enum Removal {
    Removed(ProjectRecord),
    Locked,
    Missing,
}

/// In-memory project store backing the demo analytics routes.
#[derive(Debug, Default)]
pub struct ProjectCatalog {
    projects: RwLock<BTreeMap<String, ProjectRecord>>,
}

impl ProjectCatalog {
    pub fn from_records(records: Vec<ProjectRecord>) -> Self {
        Self {
            projects: RwLock::new(
                records
                    .into_iter()
                    .map(|record| (record.id.clone(), record))
                    .collect(),
            ),
        }
    }

    pub fn get(&self, id: &str) -> Option<ProjectRecord> {
        self.projects.read().get(id).cloned()
    }

    /// Removes `id` unless it is locked. Check and removal share one write
    /// lock, so of two racing deletes only one sees `Removed`.
    pub fn remove_unlocked(&self, id: &str) -> Removal {
        let mut projects = self.projects.write();
        match projects.get(id) {
            None => Removal::Missing,
            Some(project) if project.locked => Removal::Locked,
            Some(_) => projects.remove(id).map_or(Removal::Missing, Removal::Removed),
        }
    }

    pub fn len(&self) -> usize {
        self.projects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, locked: bool) -> ProjectRecord {
        ProjectRecord {
            id: id.into(),
            name: id.into(),
            locked,
            metrics: Default::default(),
        }
    }

    #[test]
    fn locked_projects_stay() {
        let catalog = ProjectCatalog::from_records(vec![record("billing", true)]);
        assert_eq!(catalog.remove_unlocked("billing"), Removal::Locked);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn concurrent_deletes_remove_once() {
        let catalog = std::sync::Arc::new(ProjectCatalog::from_records(vec![record("p1", false)]));
        let removed: usize = (0..8)
            .map(|_| {
                let catalog = std::sync::Arc::clone(&catalog);
                std::thread::spawn(move || catalog.remove_unlocked("p1"))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .filter_map(|handle| handle.join().ok())
            .filter(|outcome| matches!(outcome, Removal::Removed(_)))
            .count();
        assert_eq!(removed, 1);
        assert!(catalog.is_empty());
    }
}
