use serde_json::{Map, Value};

use crate::{error, tools::ToolRegistry};

/// Invokes `name` and prints the JSON response.
///
/// `args_json` (a JSON object) is applied first, `pairs` override it. On
/// failure the structured error is printed on stdout before exiting, so a
/// caller reading stdout always receives JSON.
pub async fn call(
    registry: &ToolRegistry,
    name: &str,
    pairs: Vec<(String, String)>,
    args_json: Option<String>,
) {
    let mut args = match args_json.as_deref().map(serde_json::from_str::<Value>) {
        None => Map::new(),
        Some(Ok(Value::Object(map))) => map,
        Some(Ok(_)) => error!("--args must be a JSON object"),
        Some(Err(e)) => error!("Cannot parse --args. Err: {}", e),
    };
    for (key, value) in pairs {
        args.insert(key, Value::String(value));
    }

    match registry.invoke(name, &args).await {
        Ok(value) => println!("{:#}", value),
        Err(e) => {
            println!("{:#}", e.to_json());
            error!("{} failed: {}", name, e);
        }
    }
}

/// Parses a `key=value` command line argument.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got `{}`", s)),
    }
}
