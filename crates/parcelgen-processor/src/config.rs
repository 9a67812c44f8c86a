//! Processor configuration
//!
//! The defaults are the fixed constants the processor is defined by. A
//! `[processor]` table in `parcelgen.toml` may override any of them.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Qualified name of the marker annotation
pub const PARCEL_FIELD: &str = "kirisame.android.toolset.parcel.ParcelField";

/// Qualified name of the platform serialization interface
pub const PARCEL_TYPE: &str = "android.os.Parcelable";

/// Suffix for classes that already implement the serialization interface
pub const INJECTOR_SUFFIX: &str = "$$ParcelInjector";

/// Suffix for classes that do not implement the serialization interface
pub const DELEGATE_SUFFIX: &str = "$$ParcelDelegate";

/// Reserved platform framework namespace
pub const ANDROID_PREFIX: &str = "android.";

/// Reserved standard-library namespace
pub const JAVA_PREFIX: &str = "java.";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is present but unusable
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// A namespace whose classes may not carry annotated fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReservedNamespace {
    /// Qualified-name prefix, including the trailing `.`
    pub prefix: String,
    /// Human-readable owner, used in diagnostics ("Android framework")
    pub label: String,
}

impl ReservedNamespace {
    /// Create a reserved namespace
    pub fn new(prefix: impl Into<String>, label: impl Into<String>) -> Self {
        ReservedNamespace {
            prefix: prefix.into(),
            label: label.into(),
        }
    }
}

/// Processor configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProcessorConfig {
    /// Qualified name of the marker annotation
    pub annotation: String,

    /// Qualified name of the serialization interface that selects the Injector strategy
    pub serializable_type: String,

    /// Generated-name suffix for the Injector strategy
    pub injector_suffix: String,

    /// Generated-name suffix for the Delegate strategy
    pub delegate_suffix: String,

    /// Namespaces that may not contain annotated classes, checked in order
    pub reserved_namespaces: Vec<ReservedNamespace>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        ProcessorConfig {
            annotation: PARCEL_FIELD.to_string(),
            serializable_type: PARCEL_TYPE.to_string(),
            injector_suffix: INJECTOR_SUFFIX.to_string(),
            delegate_suffix: DELEGATE_SUFFIX.to_string(),
            reserved_namespaces: vec![
                ReservedNamespace::new(ANDROID_PREFIX, "Android framework"),
                ReservedNamespace::new(JAVA_PREFIX, "Java framework"),
            ],
        }
    }
}

/// `parcelgen.toml` layout
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    processor: Option<ProcessorConfig>,
}

impl ProcessorConfig {
    /// Parse the `[processor]` table of a `parcelgen.toml` document
    ///
    /// A document without the table yields the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        let config = file.processor.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a `parcelgen.toml` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.annotation.trim().is_empty() {
            return Err(ConfigError::Invalid("annotation must not be empty".to_string()));
        }
        if self.serializable_type.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "serializable-type must not be empty".to_string(),
            ));
        }
        if self.injector_suffix.is_empty() || self.delegate_suffix.is_empty() {
            return Err(ConfigError::Invalid("suffixes must not be empty".to_string()));
        }
        if self.injector_suffix == self.delegate_suffix {
            return Err(ConfigError::Invalid(format!(
                "injector and delegate suffixes must differ (both '{}')",
                self.injector_suffix
            )));
        }
        if let Some(ns) = self.reserved_namespaces.iter().find(|ns| ns.prefix.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "reserved namespace '{}' has an empty prefix",
                ns.label
            )));
        }
        Ok(())
    }

    /// Simple name of the marker annotation, as used in messages
    pub fn annotation_simple_name(&self) -> &str {
        self.annotation
            .rsplit('.')
            .next()
            .unwrap_or(&self.annotation)
    }

    /// First reserved namespace that `qualified_name` falls into
    pub fn reserved_namespace_for(&self, qualified_name: &str) -> Option<&ReservedNamespace> {
        self.reserved_namespaces
            .iter()
            .find(|ns| qualified_name.starts_with(ns.prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_the_fixed_constants() {
        let config = ProcessorConfig::default();
        assert_eq!(config.annotation, PARCEL_FIELD);
        assert_eq!(config.annotation_simple_name(), "ParcelField");
        assert_eq!(config.serializable_type, "android.os.Parcelable");
        assert_eq!(config.injector_suffix, "$$ParcelInjector");
        assert_eq!(config.delegate_suffix, "$$ParcelDelegate");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reserved_namespace_lookup() {
        let config = ProcessorConfig::default();
        assert_eq!(
            config.reserved_namespace_for("android.widget.Foo").map(|ns| ns.label.as_str()),
            Some("Android framework")
        );
        assert_eq!(
            config.reserved_namespace_for("java.util.Foo").map(|ns| ns.label.as_str()),
            Some("Java framework")
        );
        assert!(config.reserved_namespace_for("javax.inject.Foo").is_none());
        assert!(config.reserved_namespace_for("com.example.androidx.Foo").is_none());
    }

    #[test]
    fn test_missing_table_yields_defaults() {
        let config = ProcessorConfig::from_toml_str("[other]\nkey = 1\n").unwrap();
        assert_eq!(config, ProcessorConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = ProcessorConfig::from_toml_str(
            r#"
            [processor]
            delegate-suffix = "_Delegate"
            reserved-namespaces = [{ prefix = "kotlin.", label = "Kotlin standard library" }]
            "#,
        )
        .unwrap();
        assert_eq!(config.delegate_suffix, "_Delegate");
        assert_eq!(config.injector_suffix, INJECTOR_SUFFIX);
        assert_eq!(config.reserved_namespaces.len(), 1);
        assert!(config.reserved_namespace_for("java.lang.Foo").is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ProcessorConfig::from_toml_str(
            "[processor]\ninjector-suffix = \"X\"\ndelegate-suffix = \"X\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = ProcessorConfig::from_toml_str("[processor]\nannotation = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = ProcessorConfig::from_toml_str("[processor]\nannotation = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
