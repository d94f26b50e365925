//! Search-and-tag filtering over fully loaded user and project collections.
//!
//! The name match is a case-insensitive substring test; tag matching is exact
//! and case-sensitive, and every selected tag must be present. Nothing here
//! performs I/O or keeps state between calls.

pub mod handlers;
pub mod view;

use serde::{Deserialize, Serialize};

use crate::{
    projects::model::{Project, ProjectView},
    users::model::{PublicUser, User},
};

pub use view::{DiscoveryTab, DiscoveryView};

/// Suggested skill toggles shown alongside the search box.
pub const COMMON_SKILLS: [&str; 10] = [
    "JavaScript",
    "Python",
    "Java",
    "React",
    "Node.js",
    "TypeScript",
    "Docker",
    "AWS",
    "MongoDB",
    "SQL",
];

/// Something that can be filtered: a display name and a tag collection.
pub trait Discoverable {
    fn display_name(&self) -> &str;
    fn tags(&self) -> &[String];
}

impl Discoverable for User {
    fn display_name(&self) -> &str {
        &self.name
    }
    fn tags(&self) -> &[String] {
        &self.skills
    }
}

impl Discoverable for PublicUser {
    fn display_name(&self) -> &str {
        &self.name
    }
    fn tags(&self) -> &[String] {
        &self.skills
    }
}

impl Discoverable for Project {
    fn display_name(&self) -> &str {
        &self.title
    }
    fn tags(&self) -> &[String] {
        &self.tech_stack
    }
}

impl Discoverable for ProjectView {
    fn display_name(&self) -> &str {
        &self.title
    }
    fn tags(&self) -> &[String] {
        &self.tech_stack
    }
}

/// Ordered set of selected tags. Toggling is symmetric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSelection(Vec<String>);

impl TagSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `tag` when absent, removes it when present. Returns whether it is now selected.
    pub fn toggle(&mut self, tag: &str) -> bool {
        if let Some(pos) = self.0.iter().position(|t| t == tag) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(tag.to_owned());
            true
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for TagSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = TagSelection::new();
        for tag in iter {
            let tag = tag.into();
            if !selection.contains(&tag) {
                selection.0.push(tag);
            }
        }
        selection
    }
}

/// Current free-text term plus selected tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryQuery {
    pub search: String,
    pub tags: TagSelection,
}

impl DiscoveryQuery {
    pub fn new(search: impl Into<String>, tags: TagSelection) -> Self {
        Self {
            search: search.into(),
            tags,
        }
    }

    pub fn apply<'a, T: Discoverable>(&self, candidates: &'a [T]) -> Vec<&'a T> {
        filter(candidates, &self.search, self.tags.as_slice())
    }
}

/// Conjunctive, case-sensitive: every required tag must be in `tags`.
pub fn matches_all_tags(tags: Option<&[String]>, required: &[String]) -> bool {
    if required.is_empty() {
        return true;
    }
    match tags {
        Some(tags) if !tags.is_empty() => required.iter().all(|r| tags.contains(r)),
        _ => false,
    }
}

/// Disjunctive variant: at least one wanted tag is present.
pub fn matches_any_tag(tags: &[String], wanted: &[String]) -> bool {
    wanted.iter().any(|w| tags.contains(w))
}

/// Keeps candidates whose name contains `search` and whose tags include all of
/// `required_tags`. Order is preserved and `candidates` is left untouched.
pub fn filter_by<'a, T, N, G>(
    candidates: &'a [T],
    search: &str,
    required_tags: &[String],
    name: N,
    tags: G,
) -> Vec<&'a T>
where
    N: Fn(&T) -> &str,
    G: Fn(&T) -> Option<&[String]>,
{
    let needle = search.to_lowercase();
    candidates
        .iter()
        .filter(|c| needle.is_empty() || name(c).to_lowercase().contains(&needle))
        .filter(|c| matches_all_tags(tags(c), required_tags))
        .collect()
}

pub fn filter<'a, T: Discoverable>(
    candidates: &'a [T],
    search: &str,
    required_tags: &[String],
) -> Vec<&'a T> {
    filter_by(candidates, search, required_tags, T::display_name, |c| Some(c.tags()))
}
