//! Domain/range validation and direction repair
//!
//! Extractors regularly write an edge backwards ("1300 created_during Work A").
//! For relation types with a domain/range entry the corrector keeps the
//! relation if it fits, swaps it if the reverse fits, and rejects it otherwise.

use crate::domain::graph::EntityType::{self, *};

/// Allowed subject and object types of a relation type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainRange {
    pub domain: &'static [EntityType],
    pub range: &'static [EntityType],
}

impl DomainRange {
    pub fn admits(&self, source: EntityType, target: EntityType) -> bool {
        self.domain.contains(&source) && self.range.contains(&target)
    }
}

/// Domain/range entry of a normalized relation type, if it has one
///
/// `associated_with` and `refers_to` have no entry: the association minter
/// decides which shapes it emits.
pub fn domain_range(relation_type: &str) -> Option<DomainRange> {
    let (domain, range): (&'static [EntityType], &'static [EntityType]) = match relation_type {
        "created_by" => (&[Work], &[Person, Organization]),
        "created_during" => (&[Work], &[Date]),
        "created_in" | "created_at" => (&[Work], &[Place]),
        "influenced_by" => (
            &[Work, Person],
            &[Person, Organization, Concept, Place, HistoricalContext],
        ),
        "located_in_space" => (&[Person, Organization, Work], &[Place]),
        "located_in_time" => (&[Person, Organization, Work], &[Date]),
        "date_of_birth" | "date_of_death" => (&[Person], &[Date]),
        "place_of_birth" | "place_of_death" => (&[Person], &[Place]),
        "speaks_language" => (&[Person], &[Language]),
        "has_expertise_in" => (&[Person], &[Concept, Language, Genre]),
        "has_occupation" => (&[Person], &[Occupation, Role, Concept, Activity]),
        "has_role" => (&[Person], &[Role]),
        "lived_in" => (&[Person], &[Place]),
        "educated_at" => (&[Person], &[Organization, Place]),
        "has_genre" => (&[Work], &[Genre]),
        "has_theme" => (&[Work], &[Concept, Theme]),
        "has_characteristic" => (&[Work], &[Concept, Characteristic]),
        "written_in_language" => (&[Work], &[Language]),
        _ => return None,
    };
    Some(DomainRange { domain, range })
}

/// Outcome of checking one relation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// No domain/range entry for this type
    Unconstrained,
    /// Fits as written
    Valid,
    /// Fits once source and target are swapped
    Reversed,
    /// Fits in neither direction
    Invalid,
}

/// Checks relations against the domain/range table
#[derive(Debug, Clone, Copy, Default)]
pub struct PolarityCorrector;

impl PolarityCorrector {
    pub fn new() -> Self {
        Self
    }

    /// The written direction wins when both directions fit
    pub fn check(&self, relation_type: &str, source: EntityType, target: EntityType) -> Polarity {
        let Some(entry) = domain_range(relation_type) else {
            return Polarity::Unconstrained;
        };
        if entry.admits(source, target) {
            Polarity::Valid
        } else if entry.admits(target, source) {
            Polarity::Reversed
        } else {
            Polarity::Invalid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_direction_is_kept() {
        let corrector = PolarityCorrector::new();
        assert_eq!(corrector.check("created_by", Work, Person), Polarity::Valid);
        assert_eq!(corrector.check("educated_at", Person, Place), Polarity::Valid);
    }

    #[test]
    fn test_backwards_relation_is_reversed() {
        let corrector = PolarityCorrector::new();
        assert_eq!(corrector.check("created_during", Date, Work), Polarity::Reversed);
        assert_eq!(corrector.check("speaks_language", Language, Person), Polarity::Reversed);
        assert_eq!(corrector.check("has_role", Role, Person), Polarity::Reversed);
    }

    #[test]
    fn test_both_directions_fit_keeps_written_one() {
        let corrector = PolarityCorrector::new();
        assert_eq!(corrector.check("influenced_by", Person, Person), Polarity::Valid);
    }

    #[test]
    fn test_neither_direction_fits() {
        let corrector = PolarityCorrector::new();
        assert_eq!(corrector.check("created_during", Work, Place), Polarity::Invalid);
        assert_eq!(corrector.check("influenced_by", Date, Language), Polarity::Invalid);
    }

    #[test]
    fn test_association_is_unconstrained() {
        let corrector = PolarityCorrector::new();
        assert_eq!(corrector.check("associated_with", Person, Person), Polarity::Unconstrained);
        assert_eq!(corrector.check("refers_to", Person, Work), Polarity::Unconstrained);
        assert!(domain_range("refers_to").is_none());
    }
}
