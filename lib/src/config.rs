//! Defines the process-wide configuration for import runs: the entities
//! namespace, the extension to media-type mapping, and the SPARQL endpoint
//! with its credentials. Loaded once at startup from a YAML file and
//! validated before any folder is touched.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Namespace URL under which graph, entity and creation-event IRIs are
    /// minted. Must end in a slash.
    pub entities_namespace: String,
    /// Lowercase filename extension to media-type URL.
    pub media_types: BTreeMap<String, String>,
    pub sparql_endpoint: String,
    pub username: String,
    pub password: Option<String>,
    /// Display each insert command and ask for confirmation before submitting.
    #[serde(default)]
    pub review: bool,
    /// Probe each digital object's URL with a HEAD request before building
    /// its statements.
    #[serde(default)]
    pub check_availability: bool,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&text)
            .with_context(|| format!("malformed configuration in {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.entities_namespace.ends_with('/') {
            bail!("'entities_namespace' must end in a slash");
        }
        Url::parse(&self.entities_namespace).context("'entities_namespace' is not a valid URL")?;
        if !self.sparql_endpoint.starts_with("https://") {
            bail!("'sparql_endpoint' must be an https:// URL");
        }
        Url::parse(&self.sparql_endpoint).context("'sparql_endpoint' is not a valid URL")?;
        for (extension, media_type) in &self.media_types {
            if extension.is_empty() || extension.chars().any(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit()) {
                bail!(
                    "media type extension '{}' must be lowercase alphanumeric",
                    extension
                );
            }
            Url::parse(media_type).with_context(|| {
                format!("media type for extension '{}' is not a valid URL", extension)
            })?;
        }
        Ok(())
    }

    /// Prints out the current Config in a clear and readable way for command
    /// line output. The password is never echoed.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  Entities Namespace: {}", self.entities_namespace);
        println!("  SPARQL Endpoint: {}", self.sparql_endpoint);
        println!("  Username: {}", self.username);
        println!("  Review: {}", self.review);
        println!("  Check Availability: {}", self.check_availability);
        println!("  Media Types:");
        for (extension, media_type) in &self.media_types {
            println!("    {} -> {}", extension, media_type);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            entities_namespace: "https://enter.museum4punkt0.de/resource/".to_string(),
            media_types: BTreeMap::from([(
                "tif".to_string(),
                "https://www.iana.org/assignments/media-types/image/tiff".to_string(),
            )]),
            sparql_endpoint: "https://store.example.org/sparql".to_string(),
            username: "importer".to_string(),
            password: Some("secret".to_string()),
            review: false,
            check_availability: false,
        }
    }

    #[test]
    fn test_validate() {
        assert!(base().validate().is_ok());

        let mut config = base();
        config.entities_namespace = "https://example.org/resource".to_string();
        assert!(config.validate().is_err());

        let mut config = base();
        config.sparql_endpoint = "http://insecure.example.org/sparql".to_string();
        assert!(config.validate().is_err());

        let mut config = base();
        config
            .media_types
            .insert("TIF".to_string(), "https://example.org/mt".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rs-import.yml");
        std::fs::write(
            &path,
            "entities_namespace: \"https://enter.museum4punkt0.de/resource/\"\n\
             media_types:\n  tif: \"https://www.iana.org/assignments/media-types/image/tiff\"\n\
             sparql_endpoint: \"https://store.example.org/sparql\"\n\
             username: importer\npassword: secret\nreview: true\n",
        )
        .unwrap();
        let config = Config::from_file(&path).unwrap();
        assert!(config.review);
        assert!(!config.check_availability);
        assert_eq!(config.media_types.len(), 1);
    }
}
