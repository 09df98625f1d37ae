use serde::Serialize;
use serde_json::{Map, Value};

use crate::coerce::coerce;
use crate::errors::CoercionError;
use crate::field::{FieldSchema, FieldType};

/// External (display-name keyed, loosely typed) to internal (canonical-key
/// keyed, typed). Unrecognized display names are dropped on purpose: they
/// never reach the backend. Datetime fields belong to a downstream system
/// and are skipped. A recognized field with an unconvertible value raises
/// `CoercionError` for the caller to turn into a validation failure.
pub fn decode(
    external: &Map<String, Value>,
    schema: &FieldSchema,
) -> Result<Map<String, Value>, CoercionError> {
    let mut internal = Map::new();
    for (name, raw) in external {
        let Some(spec) = schema.lookup_by_display(name) else {
            continue;
        };
        if spec.field_type == FieldType::Datetime {
            continue;
        }
        let typed = coerce(raw, spec.field_type).map_err(|err| err.named(name))?;
        internal.insert(spec.canonical.clone(), typed);
    }
    Ok(internal)
}

/// Internal to external: keys with a display override are renamed, the rest
/// pass through unchanged. Values are never touched and no key is dropped.
pub fn encode(record: &Map<String, Value>, schema: &FieldSchema) -> Map<String, Value> {
    record
        .iter()
        .map(|(key, value)| {
            let out_key = schema
                .lookup_by_canonical(key)
                .map(|spec| spec.display.clone())
                .unwrap_or_else(|| key.clone());
            (out_key, value.clone())
        })
        .collect()
}

/// Payload shape for the backend's event endpoint. `conf` always comes from
/// the request path; a decoded body field that would collide with the
/// envelope keys is discarded so the path value stays authoritative.
#[derive(Clone, Debug, Serialize)]
pub struct UpdateEnvelope {
    #[serde(rename = "type")]
    kind: &'static str,
    conf: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl UpdateEnvelope {
    pub fn new(conf: impl Into<String>, mut fields: Map<String, Value>) -> Self {
        fields.remove("type");
        fields.remove("conf");
        Self {
            kind: "update",
            conf: conf.into(),
            fields,
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}
