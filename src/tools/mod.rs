//! # Tool Registry
//!
//! A fixed table of 14 tools, each mapping a name and a small set of typed
//! parameters onto one read-only Spotify Web API endpoint. The registry only
//! validates arguments and fills in the endpoint template; everything else is
//! passed through to the [`Gateway`] and the JSON response is returned as is.

mod catalog;

use reqwest::Url;
use serde_json::{Map, Value, json};

use crate::{
    error::{Error, Result},
    spotify::Gateway,
};

pub use catalog::TOOLS;

/// Static description of one tool.
#[derive(Debug)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// Path below the API base URL; `{param}` placeholders are filled from
    /// path parameters.
    pub endpoint: &'static str,
    /// Query pairs sent with every call, e.g. the search `type`.
    pub fixed: &'static [(&'static str, &'static str)],
    pub params: &'static [ParamSpec],
}

#[derive(Debug)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ParamKind,
    pub location: ParamLocation,
    pub required: bool,
    pub default: Option<&'static str>,
}

#[derive(Debug, Clone, Copy)]
pub enum ParamKind {
    /// Free text.
    Text,
    /// A Spotify ID of the given kind (`track`, `artist`, ...); URIs and
    /// open.spotify.com URLs are reduced to the bare ID.
    Id(&'static str),
    /// Positive page size, clamped to `max`.
    Limit { max: u64 },
    /// One of a fixed set of values.
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub enum ParamLocation {
    Path,
    /// Sent as a query parameter under the given key.
    Query(&'static str),
}

/// Concrete request produced from a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

pub fn all() -> &'static [ToolSpec] {
    &TOOLS
}

pub fn find(name: &str) -> Option<&'static ToolSpec> {
    TOOLS.iter().find(|tool| tool.name == name)
}

impl ToolSpec {
    /// Validates `args` and resolves the endpoint path and query.
    pub fn build_request(&self, args: &Map<String, Value>) -> Result<ToolRequest> {
        if let Some(unknown) = args
            .keys()
            .find(|key| !self.params.iter().any(|p| p.name == key.as_str()))
        {
            return Err(Error::invalid_argument(
                unknown.as_str(),
                format!("not accepted by {}", self.name),
            ));
        }

        let mut path = self.endpoint.to_string();
        let mut query: Vec<(String, String)> = self
            .fixed
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        for param in self.params {
            let value = match args.get(param.name).filter(|v| !v.is_null()) {
                Some(value) => param.coerce(value)?,
                None if param.required => {
                    return Err(Error::invalid_argument(param.name, "is required"));
                }
                None => match param.default {
                    Some(default) => default.to_string(),
                    None => continue,
                },
            };

            match param.location {
                ParamLocation::Path => {
                    path = path.replace(&format!("{{{}}}", param.name), &value);
                }
                ParamLocation::Query(key) => query.push((key.to_string(), value)),
            }
        }

        Ok(ToolRequest { path, query })
    }

    /// JSON Schema of the tool's arguments.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in self.params {
            let mut schema = match param.kind {
                ParamKind::Limit { max } => json!({ "type": "integer", "minimum": 1, "maximum": max }),
                ParamKind::Choice(options) => json!({ "type": "string", "enum": options }),
                ParamKind::Text | ParamKind::Id(_) => json!({ "type": "string" }),
            };
            schema["description"] = json!(param.description);
            if let Some(default) = param.default {
                schema["default"] = match param.kind {
                    ParamKind::Limit { .. } => default.parse::<u64>().map(Value::from).unwrap_or(Value::Null),
                    _ => json!(default),
                };
            }
            if param.required {
                required.push(param.name);
            }
            properties.insert(param.name.to_string(), schema);
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Name, description and input schema, as advertised to the assistant.
    pub fn describe(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema(),
        })
    }
}

impl ParamSpec {
    fn coerce(&self, value: &Value) -> Result<String> {
        let invalid = |reason: &str| Error::invalid_argument(self.name, reason);

        match self.kind {
            ParamKind::Text => match value.as_str().map(str::trim) {
                Some(text) if !text.is_empty() => Ok(text.to_string()),
                _ => Err(invalid("expected a non-empty string")),
            },
            ParamKind::Id(kind) => value
                .as_str()
                .and_then(|raw| normalize_id(kind, raw))
                .ok_or_else(|| invalid(&format!("expected a Spotify {kind} ID, URI or URL"))),
            ParamKind::Limit { max } => {
                let limit = match value {
                    Value::Number(n) => n.as_u64(),
                    Value::String(s) => s.trim().parse::<u64>().ok(),
                    _ => None,
                };
                match limit {
                    Some(limit) if limit > 0 => Ok(limit.min(max).to_string()),
                    _ => Err(invalid("expected a positive integer")),
                }
            }
            ParamKind::Choice(options) => match value.as_str() {
                Some(choice) if options.contains(&choice) => Ok(choice.to_string()),
                _ => Err(invalid(&format!("expected one of {}", options.join(", ")))),
            },
        }
    }
}

/// Reduces `id`, `spotify:<kind>:<id>` or `https://open.spotify.com/<kind>/<id>`
/// to the base62 ID.
pub fn normalize_id(kind: &str, raw: &str) -> Option<String> {
    let raw = raw.trim();

    let id = if let Some(rest) = raw.strip_prefix("spotify:") {
        let (prefix, id) = rest.rsplit_once(':')?;
        if prefix.rsplit(':').next() != Some(kind) {
            return None;
        }
        id.to_string()
    } else if raw.starts_with("https://") || raw.starts_with("http://") {
        let url = Url::parse(raw).ok()?;
        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        let pos = segments.iter().position(|s| *s == kind)?;
        segments.get(pos + 1)?.to_string()
    } else {
        raw.to_string()
    };

    (!id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())).then_some(id)
}

/// Dispatches tool invocations to the gateway.
pub struct ToolRegistry {
    gateway: Gateway,
}

impl ToolRegistry {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn tools(&self) -> &'static [ToolSpec] {
        all()
    }

    /// Invokes the tool `name` with JSON arguments.
    ///
    /// Argument errors are reported before any network traffic.
    pub async fn invoke(&self, name: &str, args: &Map<String, Value>) -> Result<Value> {
        let tool = find(name).ok_or_else(|| Error::UnknownTool(name.to_string()))?;
        let request = tool.build_request(args)?;
        self.gateway.call(&request.path, &request.query).await
    }
}
