use std::collections::BTreeMap;

use modkit::api::operation_builder::SchemaCollection;
use serde_json::Value;

/// Outcome of adding one schema under a component name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registered {
    Inserted,
    /// Same name, same content.
    Identical,
    /// Same name, different content; the first one is kept.
    Conflict,
}

#[derive(Debug, Default, Clone)]
pub struct ComponentsRegistry {
    /// Component name -> JSON schema (serialized under `components.schemas`)
    pub schemas: BTreeMap<String, Value>,
}

impl ComponentsRegistry {
    /// utoipa already emits `#/components/schemas/*` refs, so schemas are stored as is.
    pub fn register_schema(&mut self, name: impl Into<String>, schema: Value) -> Registered {
        let name = name.into();
        match self.schemas.get(&name) {
            Some(existing) if *existing == schema => Registered::Identical,
            Some(_) => Registered::Conflict,
            None => {
                self.schemas.insert(name, schema);
                Registered::Inserted
            }
        }
    }

    /// Register every schema of a collection; conflicts are logged and skipped.
    pub fn register_all(&mut self, schemas: SchemaCollection) {
        for (name, schema) in schemas {
            let json = match serde_json::to_value(&schema) {
                Ok(v) => v,
                Err(e) => {
                    tracing::error!(%name, error = %e, "Failed to serialize schema to JSON");
                    continue;
                }
            };
            match self.register_schema(name.clone(), json) {
                Registered::Inserted => tracing::debug!(%name, "Registered schema"),
                Registered::Identical => {}
                Registered::Conflict => tracing::error!(
                    %name,
                    "Conflicting schema content under the same component key; keeping the first"
                ),
            }
        }
    }

    pub fn has_schema(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }
}
