//! YAML rendering utilities

use anyhow::{Context, Result};
use serde::Serialize;
use yaml_rust_davvid::{Yaml, YamlEmitter};

/// Serialize data structure to a YAML string with block-style multi-line strings
pub fn to_yaml<T: Serialize>(data: &T) -> Result<String> {
    let serde_value = serde_yaml::to_value(data).context("Failed to serialize to serde value")?;
    let document = to_emitter_yaml(&serde_value);

    let mut output = String::new();
    let mut emitter = YamlEmitter::new(&mut output);
    emitter.multiline_strings(true);
    emitter.dump(&document).context("Failed to emit YAML")?;

    Ok(output)
}

/// Convert a serde_yaml::Value into the emitter's document model
fn to_emitter_yaml(value: &serde_yaml::Value) -> Yaml {
    match value {
        serde_yaml::Value::Null => Yaml::Null,
        serde_yaml::Value::Bool(b) => Yaml::Boolean(*b),
        serde_yaml::Value::Number(n) => match n.as_i64() {
            Some(i) => Yaml::Integer(i),
            None => n
                .as_f64()
                .map_or_else(|| Yaml::String(n.to_string()), |f| Yaml::Real(f.to_string())),
        },
        serde_yaml::Value::String(s) => Yaml::String(s.clone()),
        serde_yaml::Value::Sequence(seq) => Yaml::Array(seq.iter().map(to_emitter_yaml).collect()),
        serde_yaml::Value::Mapping(map) => {
            let mut hash = yaml_rust_davvid::yaml::Hash::new();
            for (k, v) in map {
                hash.insert(to_emitter_yaml(k), to_emitter_yaml(v));
            }
            Yaml::Hash(hash)
        }
        serde_yaml::Value::Tagged(tagged) => to_emitter_yaml(&tagged.value),
    }
}
