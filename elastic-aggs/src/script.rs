//! Scripts that compute a per-document value in place of a stored field

use crate::error::AggError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How the script text is interpreted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptType {
    /// The text is the script source.
    Inline,
    /// The text is the id of a stored script.
    Id,
    /// The text names a script file on the nodes.
    File,
}

impl ScriptType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptType::Inline => "inline",
            ScriptType::Id => "id",
            ScriptType::File => "file",
        }
    }
}

/// A script reference attached to an aggregation.
///
/// Renders as a bare string when only the text is set, otherwise as an
/// object keyed by the script type.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    script: String,
    script_type: Option<ScriptType>,
    lang: Option<String>,
    params: Map<String, Value>,
    // First parameter that could not be converted to JSON: (name, reason)
    rejected_param: Option<(String, String)>,
}

impl Script {
    /// Script with no explicit type; rendered as an inline script.
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            script_type: None,
            lang: None,
            params: Map::new(),
            rejected_param: None,
        }
    }

    pub fn inline(script: impl Into<String>) -> Self {
        Self::new(script).script_type(ScriptType::Inline)
    }

    /// Reference a stored script by id.
    pub fn stored(id: impl Into<String>) -> Self {
        Self::new(id).script_type(ScriptType::Id)
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name).script_type(ScriptType::File)
    }

    pub fn script(mut self, script: impl Into<String>) -> Self {
        self.script = script.into();
        self
    }

    pub fn script_type(mut self, script_type: ScriptType) -> Self {
        self.script_type = Some(script_type);
        self
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Add one parameter. Values that cannot be expressed as JSON are
    /// reported when the script is rendered.
    pub fn param<T: Serialize>(mut self, name: impl Into<String>, value: T) -> Self {
        let name = name.into();
        match serde_json::to_value(value) {
            Ok(v) => {
                if matches!(&self.rejected_param, Some((rejected, _)) if *rejected == name) {
                    self.rejected_param = None;
                }
                self.params.insert(name, v);
            }
            Err(e) => {
                if self.rejected_param.is_none() {
                    self.rejected_param = Some((name, e.to_string()));
                }
            }
        }
        self
    }

    /// Replace all parameters, including any that were rejected earlier.
    pub fn params(mut self, params: Map<String, Value>) -> Self {
        self.params = params;
        self.rejected_param = None;
        self
    }

    pub fn text(&self) -> &str {
        &self.script
    }

    pub fn kind(&self) -> Option<ScriptType> {
        self.script_type
    }

    pub fn language(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn parameters(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn source(&self) -> Result<Value, AggError> {
        if let Some((name, reason)) = &self.rejected_param {
            return Err(AggError::Serialization(format!(
                "script param [{}]: {}",
                name, reason
            )));
        }

        if self.script_type.is_none() && self.lang.is_none() && self.params.is_empty() {
            return Ok(Value::String(self.script.clone()));
        }

        let mut source = Map::new();
        let key = self.script_type.unwrap_or(ScriptType::Inline).as_str();
        source.insert(key.to_string(), Value::String(self.script.clone()));
        if let Some(lang) = &self.lang {
            source.insert("lang".to_string(), Value::String(lang.clone()));
        }
        if !self.params.is_empty() {
            source.insert("params".to_string(), Value::Object(self.params.clone()));
        }
        Ok(Value::Object(source))
    }
}

impl From<&str> for Script {
    fn from(script: &str) -> Self {
        Script::new(script)
    }
}

impl From<String> for Script {
    fn from(script: String) -> Self {
        Script::new(script)
    }
}

/// Script as written in configuration files.
///
/// Accepts either a bare string or a table:
/// `{ source = "...", type = "inline", lang = "painless", params = {...} }`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ScriptDef {
    Text(String),
    Full(ScriptTable),
}

/// Table form of a configured script.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptTable {
    pub source: String,
    #[serde(default, rename = "type")]
    pub script_type: Option<ScriptType>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
}

impl From<ScriptDef> for Script {
    fn from(def: ScriptDef) -> Self {
        match def {
            ScriptDef::Text(text) => Script::new(text),
            ScriptDef::Full(ScriptTable {
                source,
                script_type,
                lang,
                params,
            }) => {
                let mut script = Script::new(source);
                if let Some(t) = script_type {
                    script = script.script_type(t);
                }
                if let Some(l) = lang {
                    script = script.lang(l);
                }
                if let Some(p) = params {
                    script = script.params(p);
                }
                script
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_bare_script_renders_as_string() {
        let script = Script::new("doc['grade'].value");
        assert_eq!(script.source().unwrap(), json!("doc['grade'].value"));
    }

    #[test]
    fn test_inline_type_renders_object() {
        let script = Script::inline("doc['grade'].value");
        assert_eq!(
            script.source().unwrap(),
            json!({"inline": "doc['grade'].value"})
        );
    }

    #[test]
    fn test_lang_without_type_defaults_to_inline_key() {
        let script = Script::new("_value * 1.2").lang("painless");
        assert_eq!(
            script.source().unwrap(),
            json!({"inline": "_value * 1.2", "lang": "painless"})
        );
    }

    #[test]
    fn test_stored_script_with_params() {
        let script = Script::stored("my_script")
            .param("field", "grade")
            .param("factor", 1.5);
        assert_eq!(
            script.source().unwrap(),
            json!({
                "id": "my_script",
                "params": {"field": "grade", "factor": 1.5}
            })
        );
    }

    #[test]
    fn test_file_script() {
        let script = Script::file("calc_score").lang("groovy");
        assert_eq!(
            script.source().unwrap(),
            json!({"file": "calc_score", "lang": "groovy"})
        );
    }

    #[test]
    fn test_params_replace_wholesale() {
        let mut params = Map::new();
        params.insert("b".into(), json!(2));
        let script = Script::new("x").param("a", 1).params(params);
        assert_eq!(script.source().unwrap(), json!({"inline": "x", "params": {"b": 2}}));
    }

    #[test]
    fn test_rejected_param_surfaces_on_source() {
        let mut bad: HashMap<(i32, i32), i32> = HashMap::new();
        bad.insert((1, 2), 3);

        let script = Script::new("x").param("ok", 1).param("bad", bad);
        match script.source() {
            Err(AggError::Serialization(msg)) => {
                assert!(msg.starts_with("script param [bad]"), "{}", msg)
            }
            other => panic!("expected serialization error, got {:?}", other),
        }
    }

    #[test]
    fn test_params_clear_rejected_param() {
        let mut bad: HashMap<(i32, i32), i32> = HashMap::new();
        bad.insert((1, 2), 3);
        let mut good = Map::new();
        good.insert("rate".into(), json!(2));

        let script = Script::new("x").param("bad", bad).params(good);
        assert_eq!(script.parameters().get("rate"), Some(&json!(2)));
        assert!(script.parameters().get("bad").is_none());
        assert_eq!(
            script.source().unwrap(),
            json!({"inline": "x", "params": {"rate": 2}})
        );
    }

    #[test]
    fn test_param_overwrites_rejected_value() {
        let mut bad: HashMap<(i32, i32), i32> = HashMap::new();
        bad.insert((1, 2), 3);

        let script = Script::new("x").param("lookup", bad).param("lookup", 7);
        assert_eq!(
            script.source().unwrap(),
            json!({"inline": "x", "params": {"lookup": 7}})
        );
    }

    #[test]
    fn test_script_def_unknown_key_rejected() {
        let result: Result<ScriptDef, _> =
            serde_json::from_value(json!({"source": "x", "lnag": "painless"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_accessors() {
        let script = Script::inline("x").lang("painless").param("p", true);
        assert_eq!(script.text(), "x");
        assert_eq!(script.kind(), Some(ScriptType::Inline));
        assert_eq!(script.language(), Some("painless"));
        assert_eq!(script.parameters().get("p"), Some(&json!(true)));
    }

    #[test]
    fn test_script_def_text() {
        let def: ScriptDef = serde_json::from_value(json!("doc['a'].value")).unwrap();
        let script: Script = def.into();
        assert_eq!(script.source().unwrap(), json!("doc['a'].value"));
    }

    #[test]
    fn test_script_def_full() {
        let def: ScriptDef = serde_json::from_value(json!({
            "source": "stored_calc",
            "type": "id",
            "params": {"factor": 2}
        }))
        .unwrap();
        let script: Script = def.into();
        assert_eq!(
            script.source().unwrap(),
            json!({"id": "stored_calc", "params": {"factor": 2}})
        );
    }
}
