//! Tool arguments and their validation.

use editor_bridge::{ClearFields, CreateField, ExtractionMode, FieldType, FieldValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ArgumentError {
    #[error("{0}")]
    Malformed(#[from] serde_json::Error),

    #[error("{field} must be a positive integer")]
    NotPositiveInteger { field: &'static str },

    #[error("{field} must be a positive number")]
    NotPositive { field: &'static str },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}

/// Parse and validate tool arguments. Missing arguments parse as `{}`.
pub(crate) fn parse<T: DeserializeOwned + Validate>(
    arguments: Option<Value>,
) -> Result<T, ArgumentError> {
    let arguments = match arguments {
        None | Some(Value::Null) => Value::Object(Default::default()),
        Some(value) => value,
    };
    let parsed: T = serde_json::from_value(arguments)?;
    parsed.validate()?;
    Ok(parsed)
}

pub(crate) trait Validate {
    fn validate(&self) -> Result<(), ArgumentError>;
}

fn positive_page(field: &'static str, page: u32) -> Result<(), ArgumentError> {
    if page == 0 {
        return Err(ArgumentError::NotPositiveInteger { field });
    }
    Ok(())
}

fn finite(field: &'static str, value: f64) -> Result<(), ArgumentError> {
    if !value.is_finite() {
        return Err(ArgumentError::NotFinite { field });
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), ArgumentError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ArgumentError::NotPositive { field });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DisplayPdfArgs {
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
}

impl Validate for DisplayPdfArgs {
    fn validate(&self) -> Result<(), ArgumentError> {
        self.page.map_or(Ok(()), |page| positive_page("page", page))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddAnnotationArgs {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub page: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub value: Option<String>,
}

impl Validate for AddAnnotationArgs {
    fn validate(&self) -> Result<(), ArgumentError> {
        positive_page("page", self.page)?;
        finite("x", self.x)?;
        finite("y", self.y)?;
        positive("width", self.width)?;
        positive("height", self.height)
    }
}

impl AddAnnotationArgs {
    /// Checkbox values given as `"true"`/`"false"` become booleans.
    pub fn into_command(self) -> CreateField {
        let value = self.value.map(|value| match (self.field_type, value.as_str()) {
            (FieldType::Checkbox, "true") => FieldValue::Checked(true),
            (FieldType::Checkbox, "false") => FieldValue::Checked(false),
            _ => FieldValue::Text(value),
        });
        CreateField {
            field_type: self.field_type,
            page: self.page,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ExtractContentArgs {
    #[serde(default)]
    pub extraction_mode: ExtractionMode,
}

impl Validate for ExtractContentArgs {
    fn validate(&self) -> Result<(), ArgumentError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NavigatePageArgs {
    pub page: u32,
}

impl Validate for NavigatePageArgs {
    fn validate(&self) -> Result<(), ArgumentError> {
        positive_page("page", self.page)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SubmitDocumentArgs {
    #[serde(default)]
    pub download_copy: bool,
}

impl Validate for SubmitDocumentArgs {
    fn validate(&self) -> Result<(), ArgumentError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClearAnnotationsArgs {
    #[serde(default)]
    pub field_ids: Option<Vec<String>>,
    #[serde(default)]
    pub page: Option<u32>,
}

impl Validate for ClearAnnotationsArgs {
    fn validate(&self) -> Result<(), ArgumentError> {
        self.page.map_or(Ok(()), |page| positive_page("page", page))
    }
}

impl ClearAnnotationsArgs {
    /// Human readable description of what will be cleared.
    pub fn scope(&self) -> String {
        match (&self.field_ids, self.page) {
            (Some(ids), _) if !ids.is_empty() => format!("Specific fields: {}", ids.join(", ")),
            (_, Some(page)) => format!("All fields on page {page}"),
            _ => "All fields in the document".to_owned(),
        }
    }

    pub fn into_command(self) -> ClearFields {
        ClearFields {
            field_ids: self.field_ids,
            page: self.page,
        }
    }
}
