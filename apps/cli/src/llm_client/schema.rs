//! Schema descriptors passed with every request to constrain model output.
//!
//! Mirrors the subset of the Gemini `Schema` object this tool needs.
//! The descriptor is sent as `generationConfig.responseSchema` so the
//! model is biased toward the expected shape; the response validator
//! remains the authority on whether the output actually conforms.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::screening::validator::{REQUIRED_KEYS, VERDICTS};

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaType {
    Object,
    String,
    Integer,
    Array,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaDescriptor {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, SchemaDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaDescriptor>>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl SchemaDescriptor {
    fn leaf(schema_type: SchemaType) -> Self {
        SchemaDescriptor {
            schema_type,
            description: None,
            properties: None,
            items: None,
            enum_values: None,
            required: None,
        }
    }

    pub fn string() -> Self {
        Self::leaf(SchemaType::String)
    }

    pub fn integer() -> Self {
        Self::leaf(SchemaType::Integer)
    }

    pub fn array_of(items: SchemaDescriptor) -> Self {
        SchemaDescriptor {
            items: Some(Box::new(items)),
            ..Self::leaf(SchemaType::Array)
        }
    }

    pub fn enumeration(values: &[&str]) -> Self {
        SchemaDescriptor {
            enum_values: Some(values.iter().map(|v| v.to_string()).collect()),
            ..Self::leaf(SchemaType::String)
        }
    }

    pub fn object(
        properties: BTreeMap<String, SchemaDescriptor>,
        required: &[&str],
    ) -> Self {
        SchemaDescriptor {
            properties: Some(properties),
            required: Some(required.iter().map(|k| k.to_string()).collect()),
            ..Self::leaf(SchemaType::Object)
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// The response schema for a single CV evaluation: five required keys,
/// bounded integer score, three-value verdict enumeration.
pub fn evaluation_schema() -> SchemaDescriptor {
    let mut properties = BTreeMap::new();
    properties.insert(
        "match_score".to_string(),
        SchemaDescriptor::integer().describe("Match score from 0 to 100."),
    );
    properties.insert(
        "summary".to_string(),
        SchemaDescriptor::string().describe("Short summary (1-3 sentences)."),
    );
    properties.insert(
        "strengths".to_string(),
        SchemaDescriptor::array_of(SchemaDescriptor::string()),
    );
    properties.insert(
        "missing_requirements".to_string(),
        SchemaDescriptor::array_of(SchemaDescriptor::string()),
    );
    properties.insert("verdict".to_string(), SchemaDescriptor::enumeration(&VERDICTS));

    SchemaDescriptor::object(properties, &REQUIRED_KEYS)
}
