use crate::{Error, Result};
use regex::{Captures, Regex};
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::HashMap;

/// Values for `${name}` placeholders.
///
/// Lookup order: explicit values, then the process environment (when
/// enabled with [`Params::with_env`]), then the definition's default.
#[derive(Debug, Clone, Default)]
pub struct Params {
    values: HashMap<String, String>,
    env: bool,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Also resolve names from environment variables.
    pub fn with_env(mut self) -> Self {
        self.env = true;
        self
    }

    /// Explicitly set value only.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Explicit value, or the non-empty environment variable of the same name.
    pub fn resolve(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Some(v) => Some(v.to_owned()),
            None if self.env => std::env::var(key).ok().filter(|v| !v.is_empty()),
            None => None,
        }
    }

    /// Parse `-P key=value` arguments. Only the first `=` splits.
    pub fn from_args(args: &[String]) -> Result<Self> {
        args.iter().try_fold(Self::new(), |params, arg| match arg.split_once('=') {
            Some((key, value)) => Ok(params.set(key, value)),
            None => Err(Error::Config(format!(
                "invalid param '{}', expected key=value",
                arg
            ))),
        })
    }
}

/// Entry of the `params:` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ParamDef {
    #[serde(default)]
    pub required: bool,

    pub default: Option<String>,

    /// Shown by `--check`.
    pub description: Option<String>,
}

const PLACEHOLDER: &str = r"\$\{([^}]*)\}";

/// Value for one placeholder. `None` keeps the placeholder as written.
fn lookup(
    name: &str,
    params: &Params,
    defs: &HashMap<String, ParamDef>,
) -> Result<Option<String>> {
    if let Some(v) = params.resolve(name) {
        return Ok(Some(v));
    }
    let Some(def) = defs.get(name) else {
        return Ok(None);
    };
    match (&def.default, def.required) {
        (Some(default), _) => Ok(Some(default.clone())),
        (None, true) => Err(Error::Config(format!(
            "missing required parameter: {}",
            name
        ))),
        (None, false) => Ok(Some(String::new())),
    }
}

/// Replace every `${name}` in `template`.
pub fn substitute(
    template: &str,
    params: &Params,
    defs: &HashMap<String, ParamDef>,
) -> Result<String> {
    let re = Regex::new(PLACEHOLDER)?;
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in re.captures_iter(template) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        out.push_str(&template[last..whole.start]);
        match lookup(name_of(&caps), params, defs)? {
            Some(value) => out.push_str(&value),
            None => out.push_str(&template[whole.clone()]),
        }
        last = whole.end;
    }
    out.push_str(&template[last..]);
    Ok(out)
}

fn name_of<'t>(caps: &Captures<'t>) -> &'t str {
    caps.get(1).map_or("", |m| m.as_str())
}

/// Substitute in every string of a YAML tree, keys excluded.
pub fn substitute_value(
    value: &mut Value,
    params: &Params,
    defs: &HashMap<String, ParamDef>,
) -> Result<()> {
    match value {
        Value::String(s) => *s = substitute(s, params, defs)?,
        Value::Mapping(map) => {
            for (_, v) in map.iter_mut() {
                substitute_value(v, params, defs)?;
            }
        }
        Value::Sequence(seq) => {
            for v in seq {
                substitute_value(v, params, defs)?;
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_simple() {
        let params = Params::new().set("map", "Світова битва");
        let defs = HashMap::new();
        let result = substitute("map: ${map}!", &params, &defs).unwrap();
        assert_eq!(result, "map: Світова битва!");
    }

    #[test]
    fn test_substitute_multiple() {
        let params = Params::new().set("host", "example.com").set("lang", "uk");
        let defs = HashMap::new();
        let result = substitute("https://${host}/${lang}/play", &params, &defs).unwrap();
        assert_eq!(result, "https://example.com/uk/play");
    }

    #[test]
    fn test_substitute_default() {
        let params = Params::new();
        let mut defs = HashMap::new();
        defs.insert(
            "lang".to_string(),
            ParamDef {
                required: false,
                default: Some("uk".to_string()),
                description: None,
            },
        );
        let result = substitute("/${lang}/play", &params, &defs).unwrap();
        assert_eq!(result, "/uk/play");
    }

    #[test]
    fn test_substitute_required_missing() {
        let params = Params::new();
        let mut defs = HashMap::new();
        defs.insert(
            "BOT_TOKEN".to_string(),
            ParamDef {
                required: true,
                default: None,
                description: Some("Telegram bot token".to_string()),
            },
        );
        let result = substitute("${BOT_TOKEN}", &params, &defs);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_from_env() {
        std::env::set_var("MAPS_SCRAPER_TEST_TOKEN", "123:abc");
        let params = Params::new().with_env();
        let defs = HashMap::new();
        let result = substitute("${MAPS_SCRAPER_TEST_TOKEN}", &params, &defs).unwrap();
        assert_eq!(result, "123:abc");
    }

    #[test]
    fn test_explicit_param_beats_env() {
        std::env::set_var("MAPS_SCRAPER_TEST_URL", "from-env");
        let params = Params::new()
            .set("MAPS_SCRAPER_TEST_URL", "from-args")
            .with_env();
        let result = substitute("${MAPS_SCRAPER_TEST_URL}", &params, &HashMap::new()).unwrap();
        assert_eq!(result, "from-args");
    }

    #[test]
    fn test_env_ignored_unless_enabled() {
        std::env::set_var("MAPS_SCRAPER_TEST_OFF", "secret");
        let result = substitute("${MAPS_SCRAPER_TEST_OFF}", &Params::new(), &HashMap::new()).unwrap();
        assert_eq!(result, "${MAPS_SCRAPER_TEST_OFF}");
    }

    #[test]
    fn test_params_from_args() {
        let args = vec!["BOT_TOKEN=1:xyz".to_string(), "site=https://a=b".to_string()];
        let params = Params::from_args(&args).unwrap();
        assert_eq!(params.get("BOT_TOKEN"), Some("1:xyz"));
        assert_eq!(params.get("site"), Some("https://a=b"));
    }
}
