//! Response schema contracts and their structural validator.
//!
//! Each contract renders to the provider schema dialect (`OBJECT`, `ARRAY`,
//! `STRING`, `INTEGER`, `NUMBER` type tags) and validates parsed output. The
//! rendered schema is only a hint to the model; callers always validate.

use serde_json::{Map, Value, json};

/// Shape of one JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// Object with typed properties, some required
    Object {
        /// Property names and shapes, in declaration order
        properties: Vec<(&'static str, SchemaNode)>,
        /// Keys that must be present
        required: Vec<&'static str>,
    },
    /// Homogeneous array
    Array(Box<SchemaNode>),
    /// Free text
    String,
    /// Text drawn from a closed set; `aliases` are accepted but not advertised
    Enum {
        /// Advertised values
        values: &'static [&'static str],
        /// Extra accepted spellings
        aliases: &'static [&'static str],
    },
    /// Advertised as text, accepted as text or integer
    Label,
    /// Whole number
    Integer,
    /// Any number
    Number,
}

/// One structural problem found in model output.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{}: {}", path, problem)]
pub struct SchemaViolation {
    /// JSON-pointer-like location, `/` for the root
    pub path: String,
    /// What is wrong there
    pub problem: String,
}

impl SchemaNode {
    /// Render in the provider schema dialect.
    pub fn to_schema(&self) -> Value {
        match self {
            SchemaNode::Object {
                properties,
                required,
            } => {
                let props: Map<String, Value> = properties
                    .iter()
                    .map(|(name, node)| ((*name).to_string(), node.to_schema()))
                    .collect();
                json!({ "type": "OBJECT", "properties": props, "required": required })
            }
            SchemaNode::Array(items) => json!({ "type": "ARRAY", "items": items.to_schema() }),
            SchemaNode::String | SchemaNode::Label => json!({ "type": "STRING" }),
            SchemaNode::Enum { values, .. } => json!({ "type": "STRING", "enum": values }),
            SchemaNode::Integer => json!({ "type": "INTEGER" }),
            SchemaNode::Number => json!({ "type": "NUMBER" }),
        }
    }

    /// Check `value` against this shape, collecting every violation.
    pub fn validate(&self, value: &Value) -> Vec<SchemaViolation> {
        let mut violations = Vec::new();
        self.walk(value, "", &mut violations);
        violations
    }

    fn walk(&self, value: &Value, path: &str, out: &mut Vec<SchemaViolation>) {
        match self {
            SchemaNode::Object {
                properties,
                required,
            } => {
                let Some(object) = value.as_object() else {
                    out.push(wrong_type(path, "OBJECT", value));
                    return;
                };
                for key in required {
                    if !object.contains_key(*key) {
                        out.push(SchemaViolation {
                            path: display_path(&format!("{}/{}", path, key)),
                            problem: "missing required key".to_string(),
                        });
                    }
                }
                for (name, node) in properties {
                    match object.get(*name) {
                        // Optional keys may be null.
                        Some(Value::Null) if !required.contains(name) => {}
                        Some(child) => node.walk(child, &format!("{}/{}", path, name), out),
                        None => {}
                    }
                }
            }
            SchemaNode::Array(items) => {
                let Some(array) = value.as_array() else {
                    out.push(wrong_type(path, "ARRAY", value));
                    return;
                };
                for (index, item) in array.iter().enumerate() {
                    items.walk(item, &format!("{}/{}", path, index), out);
                }
            }
            SchemaNode::String => {
                if !value.is_string() {
                    out.push(wrong_type(path, "STRING", value));
                }
            }
            SchemaNode::Enum { values, aliases } => match value.as_str() {
                Some(s) if values.contains(&s) || aliases.contains(&s) => {}
                Some(s) => out.push(SchemaViolation {
                    path: display_path(path),
                    problem: format!("'{}' is not one of {}", s, values.join(", ")),
                }),
                None => out.push(wrong_type(path, "STRING", value)),
            },
            SchemaNode::Label => {
                if !(value.is_string() || is_whole_number(value)) {
                    out.push(wrong_type(path, "STRING", value));
                }
            }
            SchemaNode::Integer => {
                if !is_whole_number(value) {
                    out.push(wrong_type(path, "INTEGER", value));
                }
            }
            SchemaNode::Number => {
                if !value.is_number() {
                    out.push(wrong_type(path, "NUMBER", value));
                }
            }
        }
    }
}

fn is_whole_number(value: &Value) -> bool {
    value.is_i64() || value.is_u64()
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn wrong_type(path: &str, expected: &str, found: &Value) -> SchemaViolation {
    SchemaViolation {
        path: display_path(path),
        problem: format!("expected {}, found {}", expected, json_type(found)),
    }
}

/// Join violations for an error message.
pub fn describe_violations(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Cast role labels advertised to the model.
pub const ROLE_LABELS: &[&str] = &["Protagonista", "Elenco de Apoio", "Figuração"];
const ROLE_ALIASES: &[&str] = &["Protagonist", "Supporting Cast", "SupportingCast", "Background"];

/// Contract for structure analysis output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureSchema;

impl StructureSchema {
    /// Top-level keys whose absence is reported as a missing key.
    pub const REQUIRED: [&'static str; 3] = ["scenes", "characters_metadata", "unique_locations"];

    /// The contract as a tree.
    pub fn node() -> SchemaNode {
        let character = SchemaNode::Object {
            properties: vec![
                ("name", SchemaNode::String),
                (
                    "role",
                    SchemaNode::Enum {
                        values: ROLE_LABELS,
                        aliases: ROLE_ALIASES,
                    },
                ),
                ("costume_suggestion", SchemaNode::String),
                ("color_palette_hex", SchemaNode::String),
            ],
            required: vec!["name", "role", "costume_suggestion", "color_palette_hex"],
        };
        let scene = SchemaNode::Object {
            properties: vec![
                ("scene_number", SchemaNode::Label),
                ("header", SchemaNode::String),
                ("location", SchemaNode::String),
                ("time", SchemaNode::String),
                ("characters", SchemaNode::Array(Box::new(SchemaNode::String))),
                ("props", SchemaNode::Array(Box::new(SchemaNode::String))),
                ("summary", SchemaNode::String),
                ("estimated_duration_mins", SchemaNode::Number),
            ],
            required: vec![
                "scene_number",
                "header",
                "location",
                "time",
                "characters",
                "summary",
                "props",
            ],
        };
        SchemaNode::Object {
            properties: vec![
                ("title", SchemaNode::String),
                ("author", SchemaNode::String),
                ("logline", SchemaNode::String),
                ("total_scenes", SchemaNode::Integer),
                ("characters_metadata", SchemaNode::Array(Box::new(character))),
                ("unique_locations", SchemaNode::Array(Box::new(SchemaNode::String))),
                ("scenes", SchemaNode::Array(Box::new(scene))),
            ],
            required: Self::REQUIRED.to_vec(),
        }
    }

    /// Provider schema.
    pub fn schema() -> Value {
        Self::node().to_schema()
    }

    /// Validate parsed output.
    pub fn validate(value: &Value) -> Vec<SchemaViolation> {
        Self::node().validate(value)
    }
}

/// Contract for shot generation output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShotsSchema;

impl ShotsSchema {
    /// The contract as a tree.
    pub fn node() -> SchemaNode {
        let shot = SchemaNode::Object {
            properties: vec![
                ("shot_number", SchemaNode::Integer),
                ("size", SchemaNode::String),
                ("angle", SchemaNode::String),
                ("movement", SchemaNode::String),
                ("subject", SchemaNode::String),
                ("description", SchemaNode::String),
                ("background_details", SchemaNode::String),
                ("visual_prompt", SchemaNode::String),
            ],
            required: vec![
                "shot_number",
                "size",
                "angle",
                "movement",
                "subject",
                "description",
                "visual_prompt",
                "background_details",
            ],
        };
        SchemaNode::Object {
            properties: vec![("shots", SchemaNode::Array(Box::new(shot)))],
            required: vec!["shots"],
        }
    }

    /// Provider schema.
    pub fn schema() -> Value {
        Self::node().to_schema()
    }

    /// Validate parsed output.
    pub fn validate(value: &Value) -> Vec<SchemaViolation> {
        Self::node().validate(value)
    }
}

/// Contract for consistency repair output.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptUpdateSchema;

impl PromptUpdateSchema {
    /// The contract as a tree.
    pub fn node() -> SchemaNode {
        let update = SchemaNode::Object {
            properties: vec![
                ("shot_number", SchemaNode::Integer),
                ("visual_prompt", SchemaNode::String),
            ],
            required: vec!["shot_number", "visual_prompt"],
        };
        SchemaNode::Object {
            properties: vec![("updated_prompts", SchemaNode::Array(Box::new(update)))],
            required: vec!["updated_prompts"],
        }
    }

    /// Provider schema.
    pub fn schema() -> Value {
        Self::node().to_schema()
    }

    /// Validate parsed output.
    pub fn validate(value: &Value) -> Vec<SchemaViolation> {
        Self::node().validate(value)
    }
}
