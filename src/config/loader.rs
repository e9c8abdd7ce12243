//! Configuration files
//!
//! A config file holds the raw `{sitemapConfig, backlinksConfig}` shape as
//! JSON (`.json`) or TOML (`.toml`). Several files are layered
//! over the built-in defaults, later files winning.

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::defaults::BuiltinDefaults;
use super::error::ConfigError;
use super::merge::merge_layers;
use super::schema::SiteGraphConfig;
use super::validate::validate;

/// Read one config file into a raw value
pub fn load_file(path: &Path) -> Result<Value, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let value = match extension.as_deref() {
        Some("json") => serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: format!("JSON parse error: {}", e),
        })?,
        Some("toml") => {
            let table: toml::Value =
                toml::from_str(&contents).map_err(|e| ConfigError::Parse {
                    path: path.to_path_buf(),
                    message: format!("TOML parse error: {}", e),
                })?;
            toml_to_json(table)
        }
        _ => {
            return Err(ConfigError::Parse {
                path: path.to_path_buf(),
                message: "unsupported config file extension (expected .json or .toml)"
                    .to_string(),
            })
        }
    };

    debug!(path = %path.display(), "loaded config file");
    Ok(value)
}

/// Merge the built-in defaults and every file, in order
pub fn load_layers<P: AsRef<Path>>(paths: &[P]) -> Result<Value, ConfigError> {
    let mut layers = vec![BuiltinDefaults::default().to_value()];
    for path in paths {
        layers.push(load_file(path.as_ref())?);
    }
    Ok(merge_layers(layers))
}

/// Load, merge and validate
pub fn load_config<P: AsRef<Path>>(paths: &[P]) -> Result<SiteGraphConfig, ConfigError> {
    validate(&load_layers(paths)?)
}

fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_toml_file() {
        let file = write_config(
            ".toml",
            r#"
[sitemapConfig]
contentRoot = "./docs"
pageInclusionRules = ["**/*", "!drafts/**"]

[sitemapConfig.tagRules]
api = ["api/**"]
"#,
        );

        let value = load_file(file.path()).unwrap();
        assert_eq!(value["sitemapConfig"]["contentRoot"], "./docs");
        assert_eq!(value["sitemapConfig"]["tagRules"]["api"][0], "api/**");
    }

    #[test]
    fn test_load_json_file() {
        let file = write_config(".json", r#"{"backlinksConfig": {"visibilityRules": ["!**/*"]}}"#);
        let value = load_file(file.path()).unwrap();
        assert_eq!(value["backlinksConfig"]["visibilityRules"][0], "!**/*");
    }

    #[test]
    fn test_missing_file() {
        let err = load_file(Path::new("/nonexistent/site-graph.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/site-graph.toml"));
    }

    #[test]
    fn test_parse_error() {
        let file = write_config(".json", "{not json");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_config(".yaml", "sitemapConfig: {}");
        let err = load_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported config file extension"));
    }

    #[test]
    fn test_later_files_win() {
        let base = write_config(
            ".toml",
            "[sitemapConfig]\nincludeExternalLinks = true\ncontentRoot = \"./docs\"\n",
        );
        let overlay = write_config(".json", r#"{"sitemapConfig": {"contentRoot": "./site"}}"#);

        let config = load_config(&[base.path(), overlay.path()]).unwrap();
        assert_eq!(config.sitemap_config.content_root, "./site");
        assert!(config.sitemap_config.include_external_links);
        assert!(config.sitemap_config.ignore_starlight_links);
    }

    #[test]
    fn test_no_files_gives_defaults() {
        let paths: [&Path; 0] = [];
        let config = load_config(&paths).unwrap();
        assert_eq!(config, SiteGraphConfig::default());
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let file = write_config(".toml", "[sitemapConfig]\nincludeExternalLinks = \"yes\"\n");
        let err = load_config(&[file.path()]).unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert_eq!(
            errors.field("sitemapConfig.includeExternalLinks").unwrap(),
            ["Expected boolean, received string"]
        );
    }
}
