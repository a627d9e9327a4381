//! Server configuration: title, base URL, page size, datasets and namespace prefixes.
//!
//! The configuration is a JSON document, read with [`Config::from_file`] or assembled
//! in code with [`ConfigBuilder`]:
//!
//! ```json
//! {
//!   "title": "My fragments",
//!   "baseURL": "http://localhost:3000/",
//!   "datasources": {
//!     "people": { "title": "People", "type": "dictionary", "settings": { "file": "people.ttl" } }
//!   }
//! }
//! ```

use crate::consts::{DEFAULT_PAGE_SIZE, DEFAULT_PREFIXES, DEFAULT_TITLE};
use crate::errors::ConfigError;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use url::Url;

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

pub fn default_prefixes() -> BTreeMap<String, String> {
    DEFAULT_PREFIXES
        .iter()
        .map(|(prefix, ns)| (prefix.to_string(), ns.to_string()))
        .collect()
}

/// One entry of the `datasources` map.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DataSourceConfig {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Storage engine: `dictionary` or `oxigraph`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Engine specific settings, interpreted by the data source.
    #[serde(default)]
    pub settings: serde_json::Value,
}

impl DataSourceConfig {
    pub fn new(kind: impl Into<String>, settings: serde_json::Value) -> Self {
        DataSourceConfig {
            title: None,
            description: None,
            kind: kind.into(),
            settings,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct Config {
    #[serde(default = "default_title")]
    #[builder(default = "default_title()")]
    pub title: String,
    /// Public base URL. When absent it is derived from the request `Host` header.
    #[serde(rename = "baseURL", default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub base_url: Option<String>,
    #[serde(rename = "pageSize", default = "default_page_size")]
    #[builder(default = "DEFAULT_PAGE_SIZE")]
    pub page_size: u64,
    #[serde(default)]
    #[builder(default)]
    pub datasources: BTreeMap<String, DataSourceConfig>,
    #[serde(default = "default_prefixes")]
    #[builder(default = "default_prefixes()")]
    pub prefixes: BTreeMap<String, String>,
    /// Directory that relative data source paths are resolved against.
    #[serde(skip)]
    #[builder(default)]
    pub root: PathBuf,
}

impl ConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(names) = &self.datasources {
            for name in names.keys() {
                if !is_valid_dataset_name(name) {
                    return Err(ConfigError::InvalidName(name.clone()).to_string());
                }
            }
        }
        if self.page_size == Some(0) {
            return Err("pageSize must be at least 1".to_string());
        }
        Ok(())
    }

    /// Add one dataset to the `datasources` map.
    pub fn datasource(&mut self, name: impl Into<String>, source: DataSourceConfig) -> &mut Self {
        self.datasources
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), source);
        self
    }
}

/// Dataset names are used as a single URL path segment.
pub fn is_valid_dataset_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('/')
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn from_file(file: &Path) -> Result<Self, ConfigError> {
        let reader = std::fs::File::open(file).map_err(|source| ConfigError::Read {
            path: file.to_path_buf(),
            source,
        })?;
        let mut config: Config = serde_json::from_reader(BufReader::new(reader))?;
        config.root = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, file: &Path) -> anyhow::Result<()> {
        let config_str = serde_json::to_string_pretty(&self)?;
        let mut file = std::fs::File::create(file)?;
        file.write_all(config_str.as_bytes())?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for name in self.datasources.keys() {
            if !is_valid_dataset_name(name) {
                return Err(ConfigError::InvalidName(name.clone()));
            }
        }
        if let Some(base) = &self.base_url {
            parse_base_url(base)?;
        }
        Ok(())
    }

    /// Resolve a data source path against the configuration directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// The base URL datasets live under, falling back to `http://{host}/`.
    pub fn base_url(&self, host: Option<&str>) -> Result<Url, ConfigError> {
        match &self.base_url {
            Some(base) => parse_base_url(base),
            None => parse_base_url(&format!("http://{}/", host.unwrap_or("localhost"))),
        }
    }
}

fn parse_base_url(base: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(base).map_err(|_| ConfigError::BaseUrl(base.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::BaseUrl(base.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: Config = serde_json::from_str(
            r#"{ "datasources": { "people": { "type": "dictionary", "settings": { "file": "p.ttl" } } } }"#,
        )
        .unwrap();
        assert_eq!(config.title, DEFAULT_TITLE);
        assert_eq!(config.page_size, 100);
        assert_eq!(config.prefixes.len(), 10);
        assert_eq!(config.prefixes["hydra"], "http://www.w3.org/ns/hydra/core#");
        let people = &config.datasources["people"];
        assert_eq!(people.kind, "dictionary");
        assert!(people.title.is_none());
    }

    #[test]
    fn base_url_falls_back_to_host() {
        let config = Config::builder().build().unwrap();
        assert_eq!(
            config.base_url(Some("example.org:8080")).unwrap().as_str(),
            "http://example.org:8080/"
        );
        let config = Config::builder()
            .base_url("https://data.example.org/ldf")
            .build()
            .unwrap();
        assert_eq!(
            config.base_url(Some("ignored")).unwrap().as_str(),
            "https://data.example.org/ldf/"
        );
    }

    #[test]
    fn builder_rejects_bad_names() {
        let mut builder = Config::builder();
        builder.datasource("a/b", DataSourceConfig::new("dictionary", serde_json::json!({})));
        assert!(builder.build().is_err());
        assert!(Config::builder().page_size(0u64).build().is_err());
    }

    #[test]
    fn from_file_sets_root_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "title": "T", "pageSize": 5, "datasources": { "": { "type": "dictionary" } } }"#,
        )
        .unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::InvalidName(_))
        ));

        let config = Config::builder().title("T").page_size(5u64).build().unwrap();
        config.save_to_file(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.title, "T");
        assert_eq!(loaded.page_size, 5);
        assert_eq!(loaded.root, dir.path());
        assert_eq!(loaded.resolve_path(Path::new("x.ttl")), dir.path().join("x.ttl"));
    }
}
