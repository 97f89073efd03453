//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::compiler::{CompileOptions, UnresolvedInfluence};
use crate::domain::graph::EntityType;
use crate::domain::ontology::{Namespaces, Vocabulary};

/// Hermeneut configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub compiler: CompileOptions,
    pub namespaces: Namespaces,
    pub vocabulary: Vocabulary,
}

const CLASS_KEY_PREFIX: &str = "vocabulary.classes.";

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("HERMENEUT_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("hermeneut")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location, or defaults if there is no file
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        let threshold = self.compiler.min_confidence;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(anyhow!(
                "compiler.min_confidence must be between 0.0 and 1.0, got {threshold}"
            ));
        }
        self.namespaces.validate()?;
        self.vocabulary.validate()?;
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "compiler.min_confidence" => Ok(self.compiler.min_confidence.to_string()),
            "compiler.unresolved_influence" => {
                Ok(self.compiler.unresolved_influence.as_str().to_string())
            }
            "compiler.declare_unreferenced_entities" => {
                Ok(self.compiler.declare_unreferenced_entities.to_string())
            }

            "namespaces.entity" => Ok(self.namespaces.entity.clone()),
            "namespaces.crm" => Ok(self.namespaces.crm.clone()),
            "namespaces.rdfs" => Ok(self.namespaces.rdfs.clone()),
            "namespaces.np" => Ok(self.namespaces.np.clone()),

            "vocabulary.fallback_class" => Ok(self.vocabulary.fallback_class.clone()),
            _ => match key.strip_prefix(CLASS_KEY_PREFIX) {
                Some(type_name) => {
                    let entity_type = parse_entity_type(type_name)?;
                    Ok(self.vocabulary.class_for(entity_type).to_string())
                }
                None => Err(unknown_key(key)),
            },
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "compiler.min_confidence" => {
                let threshold: f32 = value
                    .parse()
                    .with_context(|| format!("Invalid min_confidence value: {}", value))?;
                if !(0.0..=1.0).contains(&threshold) {
                    return Err(anyhow!("Minimum confidence must be between 0.0 and 1.0"));
                }
                self.compiler.min_confidence = threshold;
            }
            "compiler.unresolved_influence" => {
                self.compiler.unresolved_influence =
                    UnresolvedInfluence::parse(value).ok_or_else(|| {
                        anyhow!(
                            "Invalid unresolved_influence policy: {}. Valid options: stub, drop",
                            value
                        )
                    })?;
            }
            "compiler.declare_unreferenced_entities" => {
                self.compiler.declare_unreferenced_entities = value
                    .parse()
                    .with_context(|| format!("Invalid boolean value: {}", value))?;
            }

            "namespaces.entity" => self.set_namespace(|ns| &mut ns.entity, value)?,
            "namespaces.crm" => self.set_namespace(|ns| &mut ns.crm, value)?,
            "namespaces.rdfs" => self.set_namespace(|ns| &mut ns.rdfs, value)?,
            "namespaces.np" => self.set_namespace(|ns| &mut ns.np, value)?,

            "vocabulary.fallback_class" => {
                let mut vocabulary = self.vocabulary.clone();
                vocabulary.fallback_class = value.to_string();
                vocabulary.validate()?;
                self.vocabulary = vocabulary;
            }
            _ => match key.strip_prefix(CLASS_KEY_PREFIX) {
                Some(type_name) => {
                    let entity_type = parse_entity_type(type_name)?;
                    let mut vocabulary = self.vocabulary.clone();
                    vocabulary
                        .classes
                        .insert(entity_type.as_str().to_string(), value.to_string());
                    vocabulary.validate()?;
                    self.vocabulary = vocabulary;
                }
                None => return Err(unknown_key(key)),
            },
        }
        Ok(())
    }

    fn set_namespace(
        &mut self,
        field: impl Fn(&mut Namespaces) -> &mut String,
        value: &str,
    ) -> anyhow::Result<()> {
        let mut namespaces = self.namespaces.clone();
        *field(&mut namespaces) = value.to_string();
        namespaces.validate()?;
        self.namespaces = namespaces;
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let mut keys: Vec<String> = [
            "compiler.min_confidence",
            "compiler.unresolved_influence",
            "compiler.declare_unreferenced_entities",
            "namespaces.entity",
            "namespaces.crm",
            "namespaces.rdfs",
            "namespaces.np",
            "vocabulary.fallback_class",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();
        keys.extend(
            EntityType::all()
                .iter()
                .map(|t| format!("{CLASS_KEY_PREFIX}{}", t.as_str())),
        );

        keys.into_iter()
            .map(|key| {
                let value = self.get(&key)?;
                Ok((key, value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}

fn parse_entity_type(name: &str) -> anyhow::Result<EntityType> {
    EntityType::parse(name).ok_or_else(|| {
        anyhow!(
            "Unknown entity type: {}. Valid types: {}",
            name,
            EntityType::all()
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow!(
        "Unknown configuration key: {}. Use `hermeneut config list` to see available keys.",
        key
    )
}
