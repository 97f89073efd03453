//! Entity registry
//!
//! Assigns every entity a stable, URI-safe local name and remembers what has
//! already been declared or minted. One registry is shared by the fact and
//! argument passes of a document so both partitions agree on identifiers.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::graph::{EntityType, Node};

use crate::domain::ontology::Property;

use super::record::{Edge, EventKey};

/// Slug a display name into a local name
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into one
/// `_`, and trims leading and trailing `_`. An empty result becomes `id`.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }
    if out.is_empty() {
        "id".to_string()
    } else {
        out
    }
}

/// Per-document identifier and emission state
#[derive(Debug, Default)]
pub struct EntityRegistry {
    /// Node id → local name
    iris: HashMap<String, String>,
    /// (slug, type) → local name; same name and type is the same entity
    identities: HashMap<(String, EntityType), String>,
    /// Every local name handed out so far
    reserved: HashSet<String>,
    /// Entity local names already declared
    declared: HashSet<String>,
    /// Classification key → local name
    classifications: HashMap<String, String>,
    /// Event key → local name of the event node
    events: HashMap<EventKey, String>,
    /// Event key → edges already written for it, in any pass
    event_edges: HashMap<EventKey, Vec<Edge>>,
    /// Creator → works whose creation they carried out, in order
    creators: HashMap<String, Vec<String>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a local name to a node; idempotent per node id
    pub fn register(&mut self, node: &Node) -> String {
        if let Some(iri) = self.iris.get(&node.id) {
            return iri.clone();
        }

        let base = slug(&node.name);
        let identity = (base.clone(), node.entity_type);
        let iri = match self.identities.get(&identity) {
            Some(iri) => iri.clone(),
            None => {
                let iri = if self.reserved.contains(&base) {
                    self.reserve(&format!("{base}_{}", node.entity_type.as_str()))
                } else {
                    self.reserve(&base)
                };
                self.identities.insert(identity, iri.clone());
                iri
            }
        };

        debug!(node_id = %node.id, iri = %iri, "Registered entity");
        self.iris.insert(node.id.clone(), iri.clone());
        iri
    }

    /// Hand out `base`, or `base_2`, `base_3`, ... if it is taken
    pub fn reserve(&mut self, base: &str) -> String {
        if self.reserved.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if self.reserved.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Local name of a registered node
    pub fn iri(&self, node_id: &str) -> Option<&str> {
        self.iris.get(node_id).map(String::as_str)
    }

    /// Mark an entity as declared; false if it already was
    pub fn mark_declared(&mut self, iri: &str) -> bool {
        self.declared.insert(iri.to_string())
    }

    pub fn is_declared(&self, iri: &str) -> bool {
        self.declared.contains(iri)
    }

    pub fn declared_count(&self) -> usize {
        self.declared.len()
    }

    pub fn classification(&self, key: &str) -> Option<&str> {
        self.classifications.get(key).map(String::as_str)
    }

    pub fn remember_classification(&mut self, key: impl Into<String>, iri: impl Into<String>) {
        self.classifications.insert(key.into(), iri.into());
    }

    /// Local name of an event minted earlier in this run
    pub fn event(&self, key: &EventKey) -> Option<&str> {
        self.events.get(key).map(String::as_str)
    }

    pub fn remember_event(&mut self, key: EventKey, iri: impl Into<String>) {
        self.events.insert(key, iri.into());
    }

    /// Record an edge written on an event node
    pub fn record_event_edge(&mut self, key: &EventKey, predicate: Property, object: &str) {
        let edges = self.event_edges.entry(key.clone()).or_default();
        if !edges.iter().any(|e| e.predicate == predicate && e.object == object) {
            edges.push(Edge {
                predicate,
                object: object.to_string(),
            });
        }
    }

    /// Edges written on an event so far
    pub fn event_edges(&self, key: &EventKey) -> &[Edge] {
        self.event_edges
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Record that an entity carried out a work's creation
    ///
    /// Both arguments are local names.
    pub fn record_creator(&mut self, creator: &str, work: &str) {
        let works = self.creators.entry(creator.to_string()).or_default();
        if !works.iter().any(|w| w == work) {
            works.push(work.to_string());
        }
    }

    /// Works a creator made, in the order the creations were recorded
    pub fn works_created_by(&self, creator: &str) -> &[String] {
        self.creators
            .get(creator)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether nothing has been registered yet
    pub fn is_empty(&self) -> bool {
        self.reserved.is_empty() && self.iris.is_empty()
    }

    /// Forget everything, ready for the next document
    pub fn reset(&mut self) {
        self.iris.clear();
        self.identities.clear();
        self.reserved.clear();
        self.declared.clear();
        self.classifications.clear();
        self.events.clear();
        self.event_edges.clear();
        self.creators.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Van den vos Reynaerde"), "van_den_vos_reynaerde");
        assert_eq!(slug("  --Old French!! "), "old_french");
        assert_eq!(slug("Jean-Marie Le Pen"), "jean_marie_le_pen");
        assert_eq!(slug("1300"), "1300");
        assert_eq!(slug("Œuvre"), "uvre");
        assert_eq!(slug("!!!"), "id");
        assert_eq!(slug(""), "id");
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = EntityRegistry::new();
        let node = Node::new("p1", EntityType::Person, "Jane Doe");

        assert_eq!(registry.register(&node), "jane_doe");
        assert_eq!(registry.register(&node), "jane_doe");
        assert_eq!(registry.iri("p1"), Some("jane_doe"));
    }

    #[test]
    fn test_same_name_and_type_share_identifier() {
        let mut registry = EntityRegistry::new();
        let a = registry.register(&Node::new("p1", EntityType::Person, "Jane Doe"));
        let b = registry.register(&Node::new("p7", EntityType::Person, "jane  doe"));

        assert_eq!(a, b);
    }

    #[test]
    fn test_colliding_slugs_of_different_types() {
        let mut registry = EntityRegistry::new();
        let place = registry.register(&Node::new("pl1", EntityType::Place, "Paris"));
        let person = registry.register(&Node::new("p1", EntityType::Person, "Paris"));
        let work = registry.register(&Node::new("w1", EntityType::Work, "Paris"));
        let second_person = registry.register(&Node::new("p2", EntityType::Person, "PARIS"));

        assert_eq!(place, "paris");
        assert_eq!(person, "paris_person");
        assert_eq!(work, "paris_work");
        assert_eq!(second_person, "paris_person");
    }

    #[test]
    fn test_reserve_suffixes() {
        let mut registry = EntityRegistry::new();

        assert_eq!(registry.reserve("work_a_creation"), "work_a_creation");
        assert_eq!(registry.reserve("work_a_creation"), "work_a_creation_2");
        assert_eq!(registry.reserve("work_a_creation"), "work_a_creation_3");
    }

    #[test]
    fn test_minted_names_never_shadow_entities() {
        let mut registry = EntityRegistry::new();
        registry.register(&Node::new("w1", EntityType::Work, "Work A"));
        let appellation = registry.reserve("work_a_appellation");
        let clash = registry.register(&Node::new("c1", EntityType::Concept, "Work A appellation"));

        assert_eq!(appellation, "work_a_appellation");
        assert_eq!(clash, "work_a_appellation_concept");
    }

    #[test]
    fn test_creators() {
        let mut registry = EntityRegistry::new();
        registry.record_creator("p1", "w1");
        registry.record_creator("p1", "w2");
        registry.record_creator("p1", "w1");

        assert_eq!(registry.works_created_by("p1"), ["w1", "w2"]);
        assert!(registry.works_created_by("p2").is_empty());
    }

    #[test]
    fn test_reset() {
        let mut registry = EntityRegistry::new();
        let iri = registry.register(&Node::new("p1", EntityType::Person, "Jane Doe"));
        registry.mark_declared(&iri);
        registry.remember_event(EventKey::creation("w1"), "work_a_creation");
        registry.record_creator("p1", "w1");

        registry.reset();

        assert!(registry.is_empty());
        assert_eq!(registry.iri("p1"), None);
        assert!(!registry.is_declared("jane_doe"));
        assert_eq!(registry.event(&EventKey::creation("w1")), None);
        assert!(registry.works_created_by("p1").is_empty());
        assert_eq!(
            registry.register(&Node::new("p1", EntityType::Person, "Jane Doe")),
            "jane_doe"
        );
    }
}
