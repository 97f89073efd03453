//! CIDOC-CRM vocabulary used by the compiler
//!
//! The property set is fixed: minters are written against it. The class an
//! entity type maps to, and the namespaces the container declares, are
//! configuration data ([`Vocabulary`], [`Namespaces`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::graph::EntityType;

/// Class of classification nodes ("Old French Speaker")
pub const TYPE_CLASS: &str = "E55_Type";

/// Class of appellation nodes that carry display names
pub const APPELLATION_CLASS: &str = "E41_Appellation";

/// CIDOC-CRM properties emitted by the minters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Property {
    IsIdentifiedBy,
    HasType,
    HasTimeSpan,
    TookPlaceAt,
    HadParticipant,
    CarriedOutBy,
    WasInfluencedBy,
    HasLocation,
    RefersTo,
    HasLanguage,
    HasResidence,
    HasCreated,
    BroughtIntoLife,
    WasDeathOf,
    HasMember,
    IsAbout,
}

impl Property {
    /// Local name in the `crm:` namespace
    pub fn local_name(&self) -> &'static str {
        match self {
            Self::IsIdentifiedBy => "P1_is_identified_by",
            Self::HasType => "P2_has_type",
            Self::HasTimeSpan => "P4_has_time-span",
            Self::TookPlaceAt => "P7_took_place_at",
            Self::HadParticipant => "P11_had_participant",
            Self::CarriedOutBy => "P14_carried_out_by",
            Self::WasInfluencedBy => "P15_was_influenced_by",
            Self::HasLocation => "P53_has_former_or_current_location",
            Self::RefersTo => "P67_refers_to",
            Self::HasLanguage => "P72_has_language",
            Self::HasResidence => "P74_has_current_or_former_residence",
            Self::HasCreated => "P94_has_created",
            Self::BroughtIntoLife => "P98_brought_into_life",
            Self::WasDeathOf => "P100_was_death_of",
            Self::HasMember => "P107_has_current_or_former_member",
            Self::IsAbout => "P129_is_about",
        }
    }

    /// Short code ("P14")
    pub fn code(&self) -> &'static str {
        let name = self.local_name();
        name.split('_').next().unwrap_or(name)
    }

    /// Prefixed name as written in Turtle
    pub fn curie(&self) -> String {
        format!("crm:{}", self.local_name())
    }
}

impl std::fmt::Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.local_name())
    }
}

/// Entity type to class mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Entity type name → class local name
    pub classes: BTreeMap<String, String>,
    /// Class for types missing from `classes`
    pub fallback_class: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        let classes = [
            (EntityType::Work, "E89_Propositional_Object"),
            (EntityType::Person, "E21_Person"),
            (EntityType::Place, "E53_Place"),
            (EntityType::Organization, "E74_Group"),
            (EntityType::Concept, "E55_Type"),
            (EntityType::Language, "E56_Language"),
            (EntityType::Date, "E52_Time-Span"),
            (EntityType::HistoricalContext, "E4_Period"),
        ]
        .into_iter()
        .map(|(t, c)| (t.as_str().to_string(), c.to_string()))
        .collect();

        Self {
            classes,
            fallback_class: "E1_CRM_Entity".to_string(),
        }
    }
}

impl Vocabulary {
    /// Class local name for an entity type
    pub fn class_for(&self, entity_type: EntityType) -> &str {
        self.classes
            .get(entity_type.as_str())
            .map(String::as_str)
            .unwrap_or(&self.fallback_class)
    }

    /// Check that every key is a canonical entity type name and every class
    /// is a usable local name
    ///
    /// Aliases such as `author` are rejected: lookups only use canonical names.
    pub fn validate(&self) -> Result<()> {
        for (type_name, class) in &self.classes {
            match EntityType::parse(type_name) {
                None => {
                    return Err(Error::ConfigError(format!(
                        "vocabulary.classes has unknown entity type '{type_name}'"
                    )));
                }
                Some(entity_type) if entity_type.as_str() != type_name => {
                    return Err(Error::ConfigError(format!(
                        "vocabulary.classes key '{type_name}' is an alias; use '{}'",
                        entity_type.as_str()
                    )));
                }
                Some(_) => {}
            }
            check_class_name(class)?;
        }
        check_class_name(&self.fallback_class)
    }
}

fn check_class_name(class: &str) -> Result<()> {
    let valid = !class.is_empty()
        && class
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::ConfigError(format!(
            "'{class}' is not a valid class name"
        )))
    }
}

/// Namespace IRIs bound to the prefixes the output uses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Namespaces {
    /// `ex:` minted resources
    pub entity: String,
    /// `crm:` CIDOC-CRM
    pub crm: String,
    /// `rdfs:`
    pub rdfs: String,
    /// `np:` nanopublication schema
    pub np: String,
}

impl Default for Namespaces {
    fn default() -> Self {
        Self {
            entity: "http://example.org/".to_string(),
            crm: "http://www.cidoc-crm.org/cidoc-crm/".to_string(),
            rdfs: "http://www.w3.org/2000/01/rdf-schema#".to_string(),
            np: "http://www.nanopub.org/nschema#".to_string(),
        }
    }
}

impl Namespaces {
    /// Prefix/IRI pairs, in declaration order
    pub fn bindings(&self) -> [(&'static str, &str); 4] {
        [
            ("crm", &self.crm),
            ("rdfs", &self.rdfs),
            ("ex", &self.entity),
            ("np", &self.np),
        ]
    }

    /// Every namespace must be an absolute IRI ending in `/` or `#`
    pub fn validate(&self) -> Result<()> {
        for (prefix, iri) in self.bindings() {
            let absolute = iri.starts_with("http://") || iri.starts_with("https://");
            let terminated = iri.ends_with('/') || iri.ends_with('#');
            if !absolute || !terminated || iri.contains(char::is_whitespace) {
                return Err(Error::ConfigError(format!(
                    "namespace '{prefix}' must be an http(s) IRI ending in '/' or '#', got '{iri}'"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_names() {
        assert_eq!(Property::CarriedOutBy.curie(), "crm:P14_carried_out_by");
        assert_eq!(Property::HasTimeSpan.code(), "P4");
        assert_eq!(Property::HasMember.code(), "P107");
    }

    #[test]
    fn test_default_classes() {
        let vocab = Vocabulary::default();

        assert_eq!(vocab.class_for(EntityType::Work), "E89_Propositional_Object");
        assert_eq!(vocab.class_for(EntityType::Date), "E52_Time-Span");
        assert_eq!(vocab.class_for(EntityType::Genre), "E1_CRM_Entity");
        assert!(vocab.validate().is_ok());
    }

    #[test]
    fn test_vocabulary_rejects_unknown_type() {
        let mut vocab = Vocabulary::default();
        vocab
            .classes
            .insert("spaceship".to_string(), "E22_Human-Made_Object".to_string());

        let err = vocab.validate().unwrap_err();
        assert_eq!(err.code(), "E600");
    }

    #[test]
    fn test_vocabulary_rejects_alias_keys() {
        let mut vocab = Vocabulary::default();
        vocab
            .classes
            .insert("author".to_string(), "E39_Actor".to_string());

        let err = vocab.validate().unwrap_err();
        assert!(err.to_string().contains("use 'person'"));
    }

    #[test]
    fn test_vocabulary_rejects_bad_class() {
        let vocab = Vocabulary {
            fallback_class: "E1 CRM Entity".to_string(),
            ..Vocabulary::default()
        };
        assert!(vocab.validate().is_err());
    }

    #[test]
    fn test_namespace_validation() {
        assert!(Namespaces::default().validate().is_ok());

        let ns = Namespaces {
            entity: "http://example.org".to_string(),
            ..Namespaces::default()
        };
        assert!(ns.validate().is_err());
    }
}
