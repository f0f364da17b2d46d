//! Documentation generator for configuration schemas
//!
//! Generates markdown documentation from a [`SchemaTree`].

use crate::config::{FieldType, SchemaField, SchemaTree};
use crate::manager::EnvironmentHandler;
use std::fmt::Write;

/// Configuration for docs generation
#[derive(Debug, Clone, Default)]
pub struct DocsConfig {
    /// Title for the documentation
    pub title: Option<String>,
    /// Description/introduction text
    pub description: Option<String>,
    /// Prefix used to name environment variables
    pub env_prefix: Option<String>,
    /// List the environment variable for every field
    pub include_env: bool,
}

impl DocsConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Show environment variable names built from `prefix`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self.include_env = true;
        self
    }

    /// Show environment variable names with no prefix
    #[must_use]
    pub fn with_env(mut self) -> Self {
        self.include_env = true;
        self
    }
}

/// Generate markdown documentation for every leaf of `schema`
///
/// Top-level fields are listed under "General", everything else under the
/// heading of its top-level section. Sections appear in the order their first
/// field was declared; each section appears once.
#[must_use]
pub fn generate_docs(schema: &SchemaTree, config: &DocsConfig) -> String {
    let mut output = String::new();
    let env = config
        .include_env
        .then(|| EnvironmentHandler::new(config.env_prefix.as_deref()));

    let title = config.title.as_deref().unwrap_or("Configuration Reference");
    let _ = writeln!(output, "# {title}\n");

    if let Some(desc) = &config.description {
        let _ = writeln!(output, "{desc}\n");
    }

    let leaves = schema.leaves();
    let mut sections: Vec<(&str, Vec<(&str, &SchemaField)>)> = Vec::new();

    for (path, field) in &leaves {
        let section = match path.split_once('.') {
            Some((top, _)) => top,
            None => "General",
        };
        match sections.iter_mut().find(|(name, _)| *name == section) {
            Some((_, fields)) => fields.push((path.as_str(), *field)),
            None => sections.push((section, vec![(path.as_str(), *field)])),
        }
    }

    for (section, fields) in &sections {
        let _ = writeln!(output, "## {}\n", capitalize(section));
        for (path, field) in fields {
            format_field(&mut output, path, field, env.as_ref());
        }
    }

    output
}

fn format_field(
    out: &mut String,
    path: &str,
    field: &SchemaField,
    env: Option<&EnvironmentHandler>,
) {
    let _ = writeln!(out, "### `{path}`\n");

    if field.is_required() {
        out.push_str("**Required**\n\n");
    }

    if let Some(desc) = &field.description {
        let _ = writeln!(out, "{desc}\n");
    }

    out.push_str("| Property | Value |\n");
    out.push_str("|----------|-------|\n");
    let _ = writeln!(out, "| **Type** | {} |", format_type(field.field_type));
    match field.default_value() {
        Some(value) => {
            let _ = writeln!(out, "| **Default** | `{value}` |");
        }
        None => out.push_str("| **Default** | none |\n"),
    }
    if let Some(env) = env {
        let _ = writeln!(out, "| **Environment** | `{}` |", env.var_name(path));
    }

    out.push_str("\n---\n\n");
}

fn format_type(t: FieldType) -> &'static str {
    match t {
        FieldType::Bool => "Boolean",
        FieldType::Int => "Integer",
        FieldType::Float => "Float",
        FieldType::String => "String",
        FieldType::List => "List",
        FieldType::Mapping => "Mapping",
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

// =============================================================================
// Tests
// =============================================================================
