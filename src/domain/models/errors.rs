use serde::Serialize;
use serde_json::Value;

/// A single rejected value, shaped like a binding error so clients can
/// point at the offending field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectError {
    pub object_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub code: String,
    pub default_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_value: Option<Value>,
}

/// Accumulates validation failures for one request object.
#[derive(Debug, Clone)]
pub struct Errors {
    object_name: String,
    errors: Vec<ObjectError>,
}

impl Errors {
    pub fn new(object_name: impl Into<String>) -> Self {
        Self { object_name: object_name.into(), errors: Vec::new() }
    }

    pub fn reject_value(&mut self, field: &str, code: &str, message: &str, rejected: Option<Value>) {
        self.errors.push(ObjectError {
            object_name: self.object_name.clone(),
            field: Some(field.to_string()),
            code: code.to_string(),
            default_message: message.to_string(),
            rejected_value: rejected,
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ObjectError] {
        &self.errors
    }

    #[cfg(test)]
    pub fn field_errors(&self, field: &str) -> impl Iterator<Item = &ObjectError> {
        self.errors.iter().filter(move |e| e.field.as_deref() == Some(field))
    }
}
