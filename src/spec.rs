//! API description structs for serde deserialization.
//!
//! This module defines the intermediate representation the pipeline consumes:
//! a flat list of named data models and HTTP operations. The IR is produced by
//! an external specification parser and is assumed to be structurally valid;
//! nothing here validates the source document beyond deserialization.

use serde::Deserialize;

/// Root API description.
#[derive(Debug, Deserialize)]
pub struct ApiSpec {
    #[serde(default)]
    pub models: Vec<ModelDef>,
    #[serde(default)]
    pub operations: Vec<OperationDef>,
}

/// A named data model with an ordered field list.
#[derive(Debug, Deserialize)]
pub struct ModelDef {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    /// Inheritance hint from the source spec. Never emitted; the generated
    /// client does not support inheritance.
    pub parent: Option<String>,
}

/// A single model field.
#[derive(Debug, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeNode,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub nullable: bool,
}

/// A loose type node: either a primitive/spec type name, a reference to a
/// model, or a container with an item type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TypeNode {
    /// Primitive or container type name (e.g. "string", "array", "map").
    #[serde(rename = "type")]
    pub name: Option<String>,
    /// Reference to a model by its raw spec name.
    #[serde(rename = "$ref")]
    pub ref_name: Option<String>,
    /// Item type for containers.
    pub items: Option<Box<TypeNode>>,
}

/// An API operation (endpoint).
#[derive(Debug, Deserialize)]
pub struct OperationDef {
    pub method: String,
    /// Raw path template, may carry a leading slash and `{param}` placeholders.
    pub path: String,
    /// Grouping tag; operations with the same tag land in the same interface.
    pub tag: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterDef>,
    /// Declared request content types, in source order.
    #[serde(default)]
    pub consumes: Vec<String>,
    /// Declared response body type. `None` means no content.
    pub response: Option<TypeNode>,
}

/// An operation parameter.
#[derive(Debug, Deserialize)]
pub struct ParameterDef {
    pub name: String,
    /// Where the parameter appears: "path", "query", "header" or "body".
    #[serde(rename = "in")]
    pub location: String,
    #[serde(rename = "type")]
    pub ty: Option<TypeNode>,
    #[serde(default)]
    pub required: bool,
}

impl ApiSpec {
    /// Parse an API description from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, crate::error::GenError> {
        serde_json::from_str(json).map_err(crate::error::GenError::Parse)
    }

    /// Look up a model by its raw spec name.
    pub fn model(&self, name: &str) -> Option<&ModelDef> {
        self.models.iter().find(|m| m.name == name)
    }
}

impl TypeNode {
    /// Shorthand for a bare reference node.
    pub fn reference(name: &str) -> Self {
        TypeNode {
            name: None,
            ref_name: Some(name.to_string()),
            items: None,
        }
    }

    /// Shorthand for a primitive node.
    pub fn primitive(name: &str) -> Self {
        TypeNode {
            name: Some(name.to_string()),
            ref_name: None,
            items: None,
        }
    }

    /// Whether this node is an array container.
    pub fn is_array(&self) -> bool {
        self.name.as_deref() == Some("array")
    }

    /// Whether this node is a map container.
    pub fn is_map(&self) -> bool {
        self.name.as_deref() == Some("map")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_spec() {
        let json = r#"{
            "models": [
                {
                    "name": "UserViewmodel",
                    "fields": [
                        { "name": "email", "type": { "type": "string" }, "required": true },
                        { "name": "pet", "type": { "$ref": "Pet" } }
                    ]
                }
            ],
            "operations": [
                {
                    "method": "GET",
                    "path": "/Pet/{id}/photo",
                    "parameters": [
                        { "name": "id", "in": "path", "type": { "type": "string" }, "required": true }
                    ],
                    "response": { "$ref": "Pet" }
                }
            ]
        }"#;

        let spec = ApiSpec::from_json(json).unwrap();
        assert_eq!(spec.models.len(), 1);
        assert_eq!(spec.operations.len(), 1);

        let model = spec.model("UserViewmodel").unwrap();
        assert_eq!(model.fields.len(), 2);
        assert!(model.fields[0].required);
        assert_eq!(model.fields[1].ty.ref_name.as_deref(), Some("Pet"));

        let op = &spec.operations[0];
        assert_eq!(op.method, "GET");
        assert_eq!(op.parameters[0].location, "path");
        assert!(op.response.as_ref().unwrap().ref_name.is_some());
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(ApiSpec::from_json("{ not json").is_err());
    }

    #[test]
    fn test_type_node_helpers() {
        assert!(TypeNode::primitive("array").is_array());
        assert!(TypeNode::primitive("map").is_map());
        assert!(!TypeNode::reference("Pet").is_array());
    }
}
