use crate::{projects::model::ProjectView, users::model::PublicUser};

use super::DiscoveryQuery;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiscoveryTab {
    #[default]
    Developers,
    Projects,
}

/// Client-side discovery state: both collections are loaded once and every
/// search or toggle recomputes the visible subset locally.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryView {
    users: Vec<PublicUser>,
    projects: Vec<ProjectView>,
    pub tab: DiscoveryTab,
    pub query: DiscoveryQuery,
}

impl DiscoveryView {
    pub fn new(users: Vec<PublicUser>, projects: Vec<ProjectView>) -> Self {
        Self {
            users,
            projects,
            ..Default::default()
        }
    }

    /// Replaces the loaded collections; the latest load wins.
    pub fn load(&mut self, users: Vec<PublicUser>, projects: Vec<ProjectView>) {
        self.users = users;
        self.projects = projects;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        self.query.tags.toggle(tag)
    }

    pub fn visible_users(&self) -> Vec<&PublicUser> {
        self.query.apply(&self.users)
    }

    pub fn visible_projects(&self) -> Vec<&ProjectView> {
        self.query.apply(&self.projects)
    }

    /// Number of results on the active tab.
    pub fn visible_count(&self) -> usize {
        match self.tab {
            DiscoveryTab::Developers => self.visible_users().len(),
            DiscoveryTab::Projects => self.visible_projects().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::{projects::model::sample_project, users::model::sample_user};

    fn view() -> DiscoveryView {
        let owner = Uuid::new_v4();
        DiscoveryView::new(
            vec![
                sample_user("Alice", &["React", "TypeScript"]).into(),
                sample_user("Bob", &["Python"]).into(),
            ],
            vec![
                ProjectView::new(sample_project("Dashboard", &["React"], owner), None),
                ProjectView::new(sample_project("Scraper", &["Python", "Docker"], owner), None),
            ],
        )
    }

    #[test]
    fn search_and_toggle_recompute_both_tabs() {
        let mut view = view();
        assert_eq!(view.visible_count(), 2);

        view.toggle_tag("React");
        assert_eq!(view.visible_users()[0].name, "Alice");
        assert_eq!(view.visible_projects()[0].title, "Dashboard");

        view.toggle_tag("React");
        view.set_search("scr");
        view.tab = DiscoveryTab::Projects;
        assert_eq!(view.visible_count(), 1);
        assert_eq!(view.visible_projects()[0].title, "Scraper");
    }

    #[test]
    fn reload_replaces_collections() {
        let mut view = view();
        view.load(vec![sample_user("Carol", &[]).into()], Vec::new());
        assert_eq!(view.visible_users().len(), 1);
        assert!(view.visible_projects().is_empty());
    }
}
