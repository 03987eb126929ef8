//! Schema Registry - Load provider and resource schemas from JSON
//!
//! The schema is embedded at compile time and describes what the host
//! runtime validates before it calls into the provider.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Embedded schema file (compiled into the binary)
const SCHEMA_FILE: &str = include_str!("../schema/provider.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Bool,
}

/// Attribute definition from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDef {
    #[serde(rename = "type")]
    pub kind: AttributeType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub optional: bool,
    /// Filled in by the provider when the user leaves it unset
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Environment variable consulted when the attribute is unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    pub description: String,
}

/// Lifecycle operation on a managed resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Delete => "delete",
        })
    }
}

/// Provider configuration block definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDef {
    pub attributes: BTreeMap<String, AttributeDef>,
}

/// Resource definition from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDef {
    pub description: String,
    pub operations: Vec<Operation>,
    pub attributes: BTreeMap<String, AttributeDef>,
}

impl ResourceDef {
    pub fn supports(&self, op: Operation) -> bool {
        self.operations.contains(&op)
    }
}

/// Root structure of schema/provider.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSchema {
    pub provider: ProviderDef,
    pub resources: BTreeMap<String, ResourceDef>,
}

/// Global schema loaded from JSON
static SCHEMA: OnceLock<ProviderSchema> = OnceLock::new();

/// Get the provider schema (parsed from embedded JSON on first access)
pub fn get_schema() -> &'static ProviderSchema {
    SCHEMA.get_or_init(|| {
        serde_json::from_str(SCHEMA_FILE)
            .unwrap_or_else(|e| panic!("Failed to parse embedded schema JSON: {}", e))
    })
}

/// Get a resource definition by type name
pub fn get_resource_schema(resource_type: &str) -> Option<&'static ResourceDef> {
    get_schema().resources.get(resource_type)
}

/// Get a provider attribute definition
pub fn get_provider_attribute(name: &str) -> Option<&'static AttributeDef> {
    get_schema().provider.attributes.get(name)
}

/// All resource type names, sorted
pub fn resource_type_names() -> Vec<&'static str> {
    get_schema().resources.keys().map(|s| s.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{API_KEY_ENV, DEFAULT_HOST};
    use crate::resource::host::RESOURCE_TYPE;

    #[test]
    fn test_schema_loads_successfully() {
        let schema = get_schema();
        assert_eq!(schema.provider.attributes.len(), 3);
        assert!(!schema.resources.is_empty());
    }

    #[test]
    fn test_host_resource_exists() {
        let resource = get_resource_schema(RESOURCE_TYPE).expect("yeet_host should exist");
        assert!(resource.supports(Operation::Create));
        assert!(resource.supports(Operation::Read));
        assert!(resource.supports(Operation::Delete));

        let prune_key = &resource.attributes["prune_key"];
        assert_eq!(prune_key.kind, AttributeType::String);
        assert!(prune_key.optional);
        assert!(prune_key.computed);
        assert!(!prune_key.sensitive);
    }

    #[test]
    fn test_resource_type_names() {
        assert_eq!(resource_type_names(), vec![RESOURCE_TYPE]);
    }

    #[test]
    fn test_provider_attributes_match_resolver() {
        let api_key = get_provider_attribute("api_key").unwrap();
        assert!(api_key.required);
        assert!(api_key.sensitive);
        assert_eq!(api_key.env.as_deref(), Some(API_KEY_ENV));

        let host = get_provider_attribute("host").unwrap();
        assert_eq!(host.default, Some(Value::String(DEFAULT_HOST.to_string())));

        let insecure = get_provider_attribute("insecure").unwrap();
        assert_eq!(insecure.kind, AttributeType::Bool);
        assert_eq!(insecure.default, Some(Value::Bool(false)));
    }

    #[test]
    fn test_unknown_resource() {
        assert!(get_resource_schema("yeet_cluster").is_none());
    }

    #[test]
    fn test_operation_display_matches_serde() {
        for op in [Operation::Create, Operation::Read, Operation::Delete] {
            assert_eq!(serde_json::to_value(op).unwrap(), Value::String(op.to_string()));
        }
    }
}
