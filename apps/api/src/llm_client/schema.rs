//! Response-shape descriptors for structured (JSON) generation.
//!
//! A small closed schema language: objects, arrays and strings, with
//! required-field lists. Serializes to the OpenAPI subset the generation
//! service accepts as `responseSchema`.

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum ResponseSchema {
    Object {
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        properties: BTreeMap<String, ResponseSchema>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        required: Vec<String>,
    },
    Array {
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        items: Box<ResponseSchema>,
    },
    String {
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl ResponseSchema {
    pub fn string() -> Self {
        ResponseSchema::String { description: None }
    }

    pub fn array_of(items: ResponseSchema) -> Self {
        ResponseSchema::Array {
            description: None,
            items: Box::new(items),
        }
    }

    pub fn object() -> Self {
        ResponseSchema::Object {
            description: None,
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            ResponseSchema::Object { description, .. }
            | ResponseSchema::Array { description, .. }
            | ResponseSchema::String { description } => *description = Some(text.into()),
        }
        self
    }

    /// Adds a property to an object schema, marking it required when `required` is set.
    /// No-op on non-object schemas.
    pub fn property(mut self, name: &str, schema: ResponseSchema, is_required: bool) -> Self {
        if let ResponseSchema::Object {
            properties,
            required,
            ..
        } = &mut self
        {
            properties.insert(name.to_string(), schema);
            if is_required && !required.iter().any(|r| r == name) {
                required.push(name.to_string());
            }
        }
        self
    }
}
