//! Relation type → event category lookup

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Kinds of real-world occurrence a group of relations describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Creation,
    Influence,
    Location,
    Association,
    PersonBirth,
    PersonDeath,
    PersonLanguage,
    PersonExpertise,
    PersonOccupation,
    PersonRole,
    PersonResidence,
    PersonEducation,
    WorkClassification,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creation => "creation",
            Self::Influence => "influence",
            Self::Location => "location",
            Self::Association => "association",
            Self::PersonBirth => "person_birth",
            Self::PersonDeath => "person_death",
            Self::PersonLanguage => "person_language",
            Self::PersonExpertise => "person_expertise",
            Self::PersonOccupation => "person_occupation",
            Self::PersonRole => "person_role",
            Self::PersonResidence => "person_residence",
            Self::PersonEducation => "person_education",
            Self::WorkClassification => "work_classification",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.as_str() == s)
    }

    pub fn all() -> &'static [EventCategory] {
        &[
            Self::Creation,
            Self::Influence,
            Self::Location,
            Self::Association,
            Self::PersonBirth,
            Self::PersonDeath,
            Self::PersonLanguage,
            Self::PersonExpertise,
            Self::PersonOccupation,
            Self::PersonRole,
            Self::PersonResidence,
            Self::PersonEducation,
            Self::WorkClassification,
        ]
    }

    /// Relation types that make up this category
    pub fn relation_types(&self) -> &'static [&'static str] {
        match self {
            Self::Creation => &["created_by", "created_during", "created_in", "created_at"],
            Self::Influence => &["influenced_by"],
            Self::Location => &["located_in_space", "located_in_time"],
            Self::Association => &["associated_with", "refers_to"],
            Self::PersonBirth => &["date_of_birth", "place_of_birth"],
            Self::PersonDeath => &["date_of_death", "place_of_death"],
            Self::PersonLanguage => &["speaks_language"],
            Self::PersonExpertise => &["has_expertise_in"],
            Self::PersonOccupation => &["has_occupation"],
            Self::PersonRole => &["has_role"],
            Self::PersonResidence => &["lived_in"],
            Self::PersonEducation => &["educated_at"],
            Self::WorkClassification => &[
                "has_genre",
                "has_theme",
                "has_characteristic",
                "written_in_language",
            ],
        }
    }

    /// Deferred categories run after every other group of a pass
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Influence)
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Static relation type → category table
#[derive(Debug, Clone)]
pub struct EventClassifier {
    table: HashMap<&'static str, EventCategory>,
}

impl Default for EventClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl EventClassifier {
    pub fn new() -> Self {
        let table = EventCategory::all()
            .iter()
            .flat_map(|c| c.relation_types().iter().map(move |t| (*t, *c)))
            .collect();
        Self { table }
    }

    /// Category of a normalized relation type
    pub fn classify(&self, relation_type: &str) -> Option<EventCategory> {
        self.table.get(relation_type).copied()
    }
}

/// `category + "_" + central entity id`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub category: EventCategory,
    pub central: String,
}

impl GroupKey {
    pub fn new(category: EventCategory, central: impl Into<String>) -> Self {
        Self {
            category,
            central: central.into(),
        }
    }

    /// Recover the category and central id from a rendered key
    ///
    /// Category names share prefixes ("person_birth", "person_death") and ids
    /// may contain `_`, so the known names are tried longest first. Only if
    /// none matches is the text split at its first `_`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut names: Vec<EventCategory> = EventCategory::all().to_vec();
        names.sort_by_key(|c| std::cmp::Reverse(c.as_str().len()));

        for category in names {
            if let Some(central) = text
                .strip_prefix(category.as_str())
                .and_then(|rest| rest.strip_prefix('_'))
                .filter(|rest| !rest.is_empty())
            {
                return Ok(Self::new(category, central));
            }
        }

        let (prefix, central) = text.split_once('_').unwrap_or((text, ""));
        match EventCategory::parse(prefix) {
            Some(category) if !central.is_empty() => Ok(Self::new(category, central)),
            _ => Err(Error::UnknownCategory(prefix.to_string())),
        }
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.category, self.central)
    }
}
