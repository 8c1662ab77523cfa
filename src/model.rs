//! The résumé data model shared by both renderers.
//!
//! Values are produced outside this crate, usually by an AI rewriting step that answers with
//! camelCase JSON. [`OptimizedResume::from_json`] is the boundary where that text becomes a
//! typed value: missing or `null` collections become empty, wrong JSON types are rejected with
//! the serde error, and structurally unusable entries are rejected by
//! [`OptimizedResume::validate`]. Renderers only ever see the typed value and never mutate it.

use std::io::Read;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ModelError;

/// Name shown in the header when the model carries none.
pub const PLACEHOLDER_NAME: &str = "YOUR NAME";

const FALLBACK_FILE_STEM: &str = "Resume";

/// Contact details shown in the sidebar. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
}

impl ContactInfo {
    /// Returns `true` when no field carries a non-blank value.
    pub fn is_empty(&self) -> bool {
        [
            &self.email,
            &self.phone,
            &self.linkedin,
            &self.website,
            &self.location,
        ]
        .into_iter()
        .all(|field| non_blank(field.as_deref()).is_none())
    }
}

/// One position in the work history.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    pub location: Option<String>,
    /// One bullet per entry, rendered in order.
    #[serde(deserialize_with = "null_as_default")]
    pub description: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    #[serde(deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    /// Grade point average. AI output sometimes carries it as a number, so both forms are
    /// accepted and normalized to text.
    #[serde(deserialize_with = "string_or_number")]
    pub gpa: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub tech_stack: Option<Vec<String>>,
    pub link: Option<String>,
}

/// The structured résumé consumed by the PDF and DOCX renderers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizedResume {
    pub full_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub contact_info: ContactInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub professional_summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "null_as_default")]
    pub certifications: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub languages: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub achievements: Vec<String>,
}

impl OptimizedResume {
    /// Parses and validates a résumé from JSON text.
    ///
    /// Markdown code fences around the payload (```` ```json ... ``` ````) are removed first,
    /// since text-generation services frequently wrap structured answers in them.
    pub fn from_json(input: &str) -> Result<Self, ModelError> {
        let resume: Self = serde_json::from_str(strip_code_fences(input))?;
        resume.validate()?;
        log::debug!(
            "parsed résumé with {} experience, {} education and {} project entries",
            resume.experience.len(),
            resume.education.len(),
            resume.projects.len()
        );
        Ok(resume)
    }

    /// Reads the whole input and delegates to [`OptimizedResume::from_json`].
    pub fn from_reader(mut reader: impl Read) -> Result<Self, ModelError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::from_json(&input)
    }

    /// Rejects entries that cannot produce a meaningful block in either renderer.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (index, entry) in self.experience.iter().enumerate() {
            if entry.role.trim().is_empty() && entry.company.trim().is_empty() {
                return Err(ModelError::invalid(
                    format!("experience[{index}]"),
                    "either `role` or `company` must be set",
                ));
            }
        }

        for (index, entry) in self.education.iter().enumerate() {
            if entry.degree.trim().is_empty() && entry.institution.trim().is_empty() {
                return Err(ModelError::invalid(
                    format!("education[{index}]"),
                    "either `degree` or `institution` must be set",
                ));
            }
        }

        for (index, project) in self.projects.iter().enumerate() {
            if project.name.trim().is_empty() {
                return Err(ModelError::invalid(
                    format!("projects[{index}].name"),
                    "project name must not be empty",
                ));
            }
        }

        Ok(())
    }

    /// Returns the full name, or [`PLACEHOLDER_NAME`] when it is missing or blank.
    pub fn display_name(&self) -> &str {
        non_blank(self.full_name.as_deref()).unwrap_or(PLACEHOLDER_NAME)
    }

    /// Builds a file stem for downloads such as `Optimized_Jane_Doe`.
    ///
    /// Runs of characters that are not alphanumeric collapse into a single `_`. An empty
    /// `prefix` yields the bare name; a missing name yields `Resume`.
    pub fn download_stem(&self, prefix: &str) -> String {
        let name = non_blank(self.full_name.as_deref())
            .map(sanitize_file_component)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| FALLBACK_FILE_STEM.to_owned());

        let prefix = sanitize_file_component(prefix);
        if prefix.is_empty() {
            name
        } else {
            format!("{prefix}_{name}")
        }
    }
}

/// Returns the trimmed value when it contains anything besides whitespace.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn sanitize_file_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_separator = false;
    for ch in value.chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(ch);
        } else {
            pending_separator = true;
        }
    }
    out
}

fn strip_code_fences(input: &str) -> &str {
    let trimmed = input.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(text)) => Ok(Some(text)),
        Some(serde_json::Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number for `gpa`, found {other}"
        ))),
    }
}
