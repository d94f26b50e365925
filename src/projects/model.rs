use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{users::model::User, validation::ValidationErrors};

/// Project record in the store. `owner_id` is fixed at creation.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub github_url: Option<String>,
    pub demo_url: Option<String>,
    pub owner_id: Uuid,
    pub collaborators: Vec<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Create/update body. Every field is optional on the wire; creation enforces
/// the required ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, alias = "liveDemoUrl", skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
}

/// Validated, normalised project fields. Link fields use `Some(None)` for "clear".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub github_url: Option<Option<String>>,
    pub demo_url: Option<Option<String>>,
}

impl ProjectInput {
    /// Validation for creation: title, description and techStack must be present.
    pub fn validate_new(&self) -> Result<ProjectChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.title.is_none() {
            errors.push("title", "title is required");
        }
        if self.description.is_none() {
            errors.push("description", "description is required");
        }
        if self.tech_stack.is_none() {
            errors.push("techStack", "techStack must be an array");
        }
        self.collect(errors)
    }

    /// Validation for updates: only the fields present are checked.
    pub fn validate_changes(&self) -> Result<ProjectChanges, ValidationErrors> {
        self.collect(ValidationErrors::new())
    }

    fn collect(&self, mut errors: ValidationErrors) -> Result<ProjectChanges, ValidationErrors> {
        let title = self.title.as_deref().map(|t| errors.required("title", t));
        let description = self
            .description
            .as_deref()
            .map(|d| errors.required("description", d));
        let tech_stack = self
            .tech_stack
            .as_deref()
            .map(|stack| check_tech_stack(stack, &mut errors));
        let github_url = self
            .github_url
            .as_deref()
            .map(|u| errors.optional_url("githubUrl", Some(u)));
        let demo_url = self
            .demo_url
            .as_deref()
            .map(|u| errors.optional_url("demoUrl", Some(u)));

        let changes = ProjectChanges {
            title,
            description,
            tech_stack,
            github_url,
            demo_url,
        };
        errors.into_result().map(|_| changes)
    }
}

fn check_tech_stack(stack: &[String], errors: &mut ValidationErrors) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(stack.len());
    for entry in stack.iter().map(|t| t.trim()) {
        if entry.is_empty() {
            errors.push("techStack", "techStack entries must not be empty");
        } else if out.iter().any(|seen| seen == entry) {
            errors.push("techStack", format!("duplicate techStack entry {entry:?}"));
        } else {
            out.push(entry.to_owned());
        }
    }
    out
}

impl ProjectChanges {
    pub fn apply(self, project: &mut Project) {
        if let Some(title) = self.title {
            project.title = title;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(tech_stack) = self.tech_stack {
            project.tech_stack = tech_stack;
        }
        if let Some(github_url) = self.github_url {
            project.github_url = github_url;
        }
        if let Some(demo_url) = self.demo_url {
            project.demo_url = demo_url;
        }
    }
}

/// Owner reference embedded in project responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Wire representation of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    pub github_url: Option<String>,
    pub demo_url: Option<String>,
    pub owner: OwnerSummary,
    #[serde(default)]
    pub collaborators: Vec<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ProjectView {
    pub fn new(project: Project, owner: Option<&User>) -> Self {
        Self {
            id: project.id,
            title: project.title,
            description: project.description,
            tech_stack: project.tech_stack,
            github_url: project.github_url,
            demo_url: project.demo_url,
            owner: OwnerSummary {
                id: project.owner_id,
                name: owner.map(|u| u.name.clone()),
                email: owner.map(|u| u.email.clone()),
            },
            collaborators: project.collaborators,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_project(title: &str, tech: &[&str], owner_id: Uuid) -> Project {
    let now = OffsetDateTime::now_utc();
    Project {
        id: Uuid::new_v4(),
        title: title.into(),
        description: format!("{title} description"),
        tech_stack: tech.iter().map(|t| t.to_string()).collect(),
        github_url: None,
        demo_url: None,
        owner_id,
        collaborators: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_title_description_and_stack() {
        let errors = ProjectInput::default().validate_new().unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec!["title", "description", "techStack"]);
    }

    #[test]
    fn create_rejects_blank_text_and_duplicate_tech() {
        let input = ProjectInput {
            title: Some("  ".into()),
            description: Some("A compiler".into()),
            tech_stack: Some(vec!["Rust".into(), " Rust ".into()]),
            ..Default::default()
        };
        let errors = input.validate_new().unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec!["title", "techStack"]);
    }

    #[test]
    fn create_normalises_fields() {
        let input: ProjectInput = serde_json::from_value(serde_json::json!({
            "title": " X ",
            "description": "Y",
            "techStack": ["Go", " Rust"],
            "githubUrl": "",
            "liveDemoUrl": "https://demo.example.com"
        }))
        .unwrap();
        let changes = input.validate_new().expect("valid");
        assert_eq!(changes.title.as_deref(), Some("X"));
        assert_eq!(changes.tech_stack, Some(vec!["Go".to_string(), "Rust".to_string()]));
        assert_eq!(changes.github_url, Some(None));
        assert_eq!(
            changes.demo_url,
            Some(Some("https://demo.example.com".to_string()))
        );
    }

    #[test]
    fn tech_stack_must_be_strings() {
        let parsed = serde_json::from_value::<ProjectInput>(serde_json::json!({
            "title": "X",
            "description": "Y",
            "techStack": "Go"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn update_applies_only_present_fields() {
        let mut project = sample_project("X", &["Go"], Uuid::new_v4());
        let owner = project.owner_id;
        let input = ProjectInput {
            tech_stack: Some(vec!["Go".into(), "Rust".into()]),
            ..Default::default()
        };
        input.validate_changes().expect("valid").apply(&mut project);

        assert_eq!(project.title, "X");
        assert_eq!(project.tech_stack, vec!["Go", "Rust"]);
        assert_eq!(project.owner_id, owner);
    }
}
