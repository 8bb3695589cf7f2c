use serde_json::Value;

use super::{FieldReader, Mode};
use crate::error::FieldErrors;

/// Validated create-project payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub role: String,
    pub tools: Vec<String>,
    pub summary: String,
    pub outcome: String,
    pub image_url: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
}

/// Validated partial project update. URL fields use `Some(None)` to clear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub role: Option<String>,
    pub tools: Option<Vec<String>>,
    pub summary: Option<String>,
    pub outcome: Option<String>,
    pub image_url: Option<Option<String>>,
    pub github_url: Option<Option<String>>,
    pub live_url: Option<Option<String>>,
}

fn read_tools(reader: &mut FieldReader<'_>) -> Option<Vec<String>> {
    let raw = reader.string_array("tools", true)?;
    let mut tools = Vec::with_capacity(raw.len());
    let mut ok = true;
    for (index, tool) in raw.iter().enumerate() {
        let tool = tool.trim();
        if tool.is_empty() {
            reader.error("tools", format!("item {index} must not be empty"));
            ok = false;
        } else {
            tools.push(tool.to_string());
        }
    }
    ok.then_some(tools)
}

fn read_project(reader: &mut FieldReader<'_>) -> ProjectPatch {
    ProjectPatch {
        title: reader.text("title", true),
        description: reader.text("description", true),
        role: reader.text("role", true),
        tools: read_tools(reader),
        summary: reader.text("summary", true),
        outcome: reader.text("outcome", true),
        image_url: reader.url("imageUrl"),
        github_url: reader.url("githubUrl"),
        live_url: reader.url("liveUrl"),
    }
}

/// Validate a full project payload.
pub fn validate_new_project(payload: &Value) -> Result<NewProject, FieldErrors> {
    let mut reader = FieldReader::new(payload, Mode::Create);
    let fields = read_project(&mut reader);
    reader.finish(NewProject {
        title: fields.title.unwrap_or_default(),
        description: fields.description.unwrap_or_default(),
        role: fields.role.unwrap_or_default(),
        tools: fields.tools.unwrap_or_default(),
        summary: fields.summary.unwrap_or_default(),
        outcome: fields.outcome.unwrap_or_default(),
        image_url: fields.image_url.flatten(),
        github_url: fields.github_url.flatten(),
        live_url: fields.live_url.flatten(),
    })
}

/// Validate a partial project payload.
pub fn validate_project_patch(payload: &Value) -> Result<ProjectPatch, FieldErrors> {
    let mut reader = FieldReader::new(payload, Mode::Update);
    let patch = read_project(&mut reader);
    reader.finish(patch)
}
