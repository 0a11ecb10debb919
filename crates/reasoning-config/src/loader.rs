//! Load order: `MctsFullConfig::default()` ≺ file (YAML, then JSON on
//! parse failure; missing file is not an error) ≺ environment
//! variables (prefix `MCTS_`, `__` nesting separator) (§6).

use crate::config::MctsFullConfig;
use crate::error::{ConfigError, ConfigResult};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

const ENV_PREFIX: &str = "MCTS_";
const ENV_SEPARATOR: &str = "__";

pub fn load(path: Option<&Path>) -> ConfigResult<MctsFullConfig> {
    let mut value = serde_json::to_value(MctsFullConfig::default())
        .expect("MctsFullConfig::default always serializes");

    if let Some(path) = path {
        if let Some(file_value) = read_file(path)? {
            merge_json(&mut value, file_value);
        }
    }

    apply_env_overrides(&mut value, std::env::vars().collect())?;

    let config: MctsFullConfig =
        serde_json::from_value(value).map_err(|err| ConfigError::Parse {
            path: path.map(|p| p.display().to_string()).unwrap_or_default(),
            yaml_err: String::new(),
            json_err: err.to_string(),
        })?;
    Ok(config)
}

fn read_file(path: &Path) -> ConfigResult<Option<Value>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(ConfigError::Io {
                path: path.display().to_string(),
                source: err,
            })
        }
    };

    match serde_yaml::from_str::<Value>(&contents) {
        Ok(value) => Ok(Some(value)),
        Err(yaml_err) => match serde_json::from_str::<Value>(&contents) {
            Ok(value) => Ok(Some(value)),
            Err(json_err) => Err(ConfigError::Parse {
                path: path.display().to_string(),
                yaml_err: yaml_err.to_string(),
                json_err: json_err.to_string(),
            }),
        },
    }
}

fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(base_value) => merge_json(base_value, overlay_value),
                    None => {
                        base_map.insert(key, overlay_value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn apply_env_overrides(value: &mut Value, vars: HashMap<String, String>) -> ConfigResult<()> {
    let mut entries: Vec<_> = vars
        .into_iter()
        .filter(|(key, _)| key.starts_with(ENV_PREFIX))
        .collect();
    entries.sort();

    for (key, raw) in entries {
        let path = &key[ENV_PREFIX.len()..];
        let segments: Vec<String> = path
            .split(ENV_SEPARATOR)
            .map(|segment| segment.to_lowercase())
            .collect();
        if segments.is_empty() || segments.iter().any(String::is_empty) {
            return Err(ConfigError::InvalidEnvOverride {
                key: key.clone(),
                value: raw,
                reason: "empty path segment".to_string(),
            });
        }
        let coerced = coerce_env_value(&raw);
        set_path(value, &segments, coerced);
    }
    Ok(())
}

fn set_path(root: &mut Value, segments: &[String], new_value: Value) {
    let Value::Object(map) = root else {
        return;
    };
    let [head, tail @ ..] = segments else {
        return;
    };
    if tail.is_empty() {
        map.insert(head.clone(), new_value);
        return;
    }
    let entry = map
        .entry(head.clone())
        .or_insert_with(|| Value::Object(serde_json::Map::new()));
    set_path(entry, tail, new_value);
}

/// Best-effort string-typed coercion: bool, then integer, then float,
/// then a `humantime` duration expressed as milliseconds, falling back
/// to a plain JSON string.
fn coerce_env_value(raw: &str) -> Value {
    if let Ok(b) = raw.parse::<bool>() {
        return Value::Bool(b);
    }
    if let Ok(n) = raw.parse::<u64>() {
        return Value::Number(n.into());
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(n) = raw.parse::<f64>() {
        if let Some(num) = serde_json::Number::from_f64(n) {
            return Value::Number(num);
        }
    }
    if let Ok(duration) = humantime::parse_duration(raw) {
        return Value::Number((duration.as_millis() as u64).into());
    }
    Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_not_an_error() {
        let cfg = load(Some(Path::new("/nonexistent/path/does-not-exist.yaml"))).unwrap();
        assert_eq!(cfg, MctsFullConfig::default());
    }

    #[test]
    fn loads_yaml_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "budget:\n  max_nodes: 500\n").unwrap();
        let cfg = load(Some(file.path())).unwrap();
        assert_eq!(cfg.budget.max_nodes, 500);
        assert_eq!(cfg.budget.max_depth, MctsFullConfig::default().budget.max_depth);
    }

    #[test]
    fn falls_back_to_json_on_yaml_parse_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"budget": {{"max_nodes": 77}}}}"#).unwrap();
        let cfg = load(Some(file.path())).unwrap();
        assert_eq!(cfg.budget.max_nodes, 77);
    }

    #[test]
    fn env_override_wins_over_file_and_defaults() {
        let mut value = serde_json::to_value(MctsFullConfig::default()).unwrap();
        let mut vars = HashMap::new();
        vars.insert("MCTS_BUDGET__MAX_NODES".to_string(), "42".to_string());
        vars.insert(
            "MCTS_ALGORITHM__DEFAULT_TIMEOUT".to_string(),
            "2s".to_string(),
        );
        apply_env_overrides(&mut value, vars).unwrap();
        let cfg: MctsFullConfig = serde_json::from_value(value).unwrap();
        assert_eq!(cfg.budget.max_nodes, 42);
        assert_eq!(cfg.algorithm.default_timeout.as_secs(), 2);
    }

    #[test]
    fn coerces_bool_and_float_env_values() {
        assert_eq!(coerce_env_value("true"), Value::Bool(true));
        assert_eq!(coerce_env_value("3.5"), Value::from(3.5));
        assert_eq!(coerce_env_value("not-a-number"), Value::from("not-a-number"));
    }
}
