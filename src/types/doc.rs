//! Documentation payload and cached record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Documentation extracted for a single function.
///
/// Any field may be absent: a real page can lack a return-value section,
/// and partial documentation is still documentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSections {
    /// Function signature, as shown in the page's Syntax block.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_empty"
    )]
    pub syntax: Option<String>,
    /// Short summary of what the function does.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_empty"
    )]
    pub description: Option<String>,
    /// Return-value semantics.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_empty"
    )]
    pub return_value: Option<String>,
    /// Paragraphs under the Parameters heading, in page order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
    /// Name the documentation was actually found under, when it differs
    /// from the requested one (`OpenMutexA` is documented as `OpenMutexW`).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_empty"
    )]
    pub resolved_as: Option<String>,
}

impl DocSections {
    /// Create an empty set of sections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the syntax block.
    pub fn syntax(mut self, syntax: impl Into<String>) -> Self {
        self.syntax = Some(syntax.into());
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the return-value text.
    pub fn return_value(mut self, return_value: impl Into<String>) -> Self {
        self.return_value = Some(return_value.into());
        self
    }

    /// Set the parameter paragraphs.
    pub fn parameters(mut self, parameters: Vec<String>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Record the name the page was resolved under.
    pub fn resolved_as(mut self, name: impl Into<String>) -> Self {
        self.resolved_as = Some(name.into());
        self
    }

    /// Whether none of the three primary sections is present.
    pub fn is_empty(&self) -> bool {
        self.syntax.is_none() && self.description.is_none() && self.return_value.is_none()
    }
}

/// A cached lookup outcome for one identifier.
///
/// `found = false` is a negative entry: the identifier was looked up and
/// confirmed to have no documentation, so it is not fetched again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocRecord {
    /// Normalized identifier. Stored as the map key on disk, not inside
    /// the record.
    #[serde(skip)]
    pub identifier: String,
    #[serde(flatten)]
    pub sections: DocSections,
    /// When the fetch that produced this record completed. Absent in
    /// files written before timestamps were recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    pub found: bool,
}

impl DocRecord {
    /// Record for an identifier with documentation.
    pub fn found(identifier: impl Into<String>, sections: DocSections) -> Self {
        Self {
            identifier: identifier.into(),
            sections,
            fetched_at: Some(Utc::now()),
            found: true,
        }
    }

    /// Negative record: the identifier is confirmed undocumented.
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            sections: DocSections::default(),
            fetched_at: Some(Utc::now()),
            found: false,
        }
    }
}

/// Treat `""` (and `null`) as absent.
///
/// Older cache files stored missing sections as empty strings.
fn non_empty<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
