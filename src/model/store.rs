use indexmap::IndexMap;

use super::project::Project;

/// All projects, keyed by name, in the order they were created.
///
/// Reads hand out shared borrows or owned copies; the only way to change a
/// project is to `checkout` a copy, mutate it, and `commit` it back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    projects: IndexMap<String, Project>,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    pub fn from_projects(projects: IndexMap<String, Project>) -> Self {
        Store { projects }
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.projects.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Project> {
        self.projects.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Project)> {
        self.projects.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Owned copy of a project, to be mutated and committed
    pub fn checkout(&self, name: &str) -> Option<Project> {
        self.projects.get(name).cloned()
    }

    /// Write a project back, replacing the stored one in place or appending
    /// it if the name is new
    pub fn commit(&mut self, name: &str, project: Project) {
        if let Some(slot) = self.projects.get_mut(name) {
            *slot = project;
        } else {
            self.projects.insert(name.to_string(), project);
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Project> {
        self.projects.shift_remove(name)
    }

    /// Rename a project keeping its position. Returns false if `old` is missing.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        let Some(index) = self.projects.get_index_of(old) else {
            return false;
        };
        if let Some(project) = self.projects.shift_remove(old) {
            self.projects.shift_insert(index, new.to_string(), project);
        }
        true
    }
}
