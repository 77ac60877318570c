//! Read-only taxonomy queries consumed by the axiom build.
//!
//! Loading release files is a collaborator concern; the build only needs the
//! queries on [`Taxonomy`]. [`TaxonomySnapshot`] is the in-memory
//! implementation loaders populate and tests build directly. It is treated
//! as immutable once a build starts.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::axiom::Axiom;
use crate::domain::{ConceptId, DatatypeProperty, Relationship};

/// Query interface over one immutable taxonomy snapshot.
pub trait Taxonomy {
    /// Every concept identifier in the snapshot.
    fn all_concept_ids(&self) -> BTreeSet<ConceptId>;

    /// Transitive descendants of a concept via stated `is a` edges,
    /// excluding the concept itself. Empty for unknown concepts.
    fn descendants(&self, concept: ConceptId) -> BTreeSet<ConceptId>;

    /// Stated relationship facts for a concept.
    fn stated_relationships(&self, concept: ConceptId) -> &[Relationship];

    /// Stated datatype facts for a concept.
    fn stated_datatypes(&self, concept: ConceptId) -> &[DatatypeProperty];

    /// Whether the concept's definition is necessary-only (primitive) or
    /// necessary-and-sufficient (fully defined).
    fn is_primitive(&self, concept: ConceptId) -> bool;

    /// Preferred label text, if one is known.
    fn preferred_label(&self, concept: ConceptId) -> Option<&str>;

    /// Directly-asserted axioms already associated with the concept (from
    /// the axiom reference set). Merged into the theory, never generated.
    fn concept_axioms(&self, concept: ConceptId) -> &[Axiom];
}

/// In-memory [`Taxonomy`] built up by a loader (or a test) one fact at a
/// time. Descendant queries walk the `is a` child index transitively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomySnapshot {
    concepts: BTreeSet<ConceptId>,
    fully_defined: BTreeSet<ConceptId>,
    relationships: HashMap<ConceptId, Vec<Relationship>>,
    datatypes: HashMap<ConceptId, Vec<DatatypeProperty>>,
    labels: HashMap<ConceptId, String>,
    asserted_axioms: HashMap<ConceptId, Vec<Axiom>>,
    /// `parent -> stated children`, maintained from `is a` facts.
    children: HashMap<ConceptId, BTreeSet<ConceptId>>,
}

impl TaxonomySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a concept. `primitive = false` marks it fully defined.
    pub fn add_concept(&mut self, concept: ConceptId, primitive: bool) -> &mut Self {
        self.concepts.insert(concept);
        if primitive {
            self.fully_defined.remove(&concept);
        } else {
            self.fully_defined.insert(concept);
        }
        self
    }

    /// Add a stated relationship sourced at `concept`. `is a` facts also
    /// feed the child index used by descendant queries.
    pub fn add_relationship(
        &mut self,
        concept: ConceptId,
        relationship: Relationship,
    ) -> &mut Self {
        self.concepts.insert(concept);
        self.concepts.insert(relationship.destination_id);
        if relationship.is_is_a() {
            self.children
                .entry(relationship.destination_id)
                .or_default()
                .insert(concept);
        }
        self.relationships.entry(concept).or_default().push(relationship);
        self
    }

    pub fn add_datatype(&mut self, concept: ConceptId, datatype: DatatypeProperty) -> &mut Self {
        self.concepts.insert(concept);
        self.datatypes.entry(concept).or_default().push(datatype);
        self
    }

    pub fn set_label(&mut self, concept: ConceptId, label: &str) -> &mut Self {
        self.labels.insert(concept, label.to_string());
        self
    }

    /// Attach a directly-asserted axiom from the axiom reference set.
    pub fn add_axiom(&mut self, concept: ConceptId, axiom: Axiom) -> &mut Self {
        self.concepts.insert(concept);
        self.asserted_axioms.entry(concept).or_default().push(axiom);
        self
    }

    pub fn contains(&self, concept: ConceptId) -> bool {
        self.concepts.contains(&concept)
    }
}

impl Taxonomy for TaxonomySnapshot {
    fn all_concept_ids(&self) -> BTreeSet<ConceptId> {
        self.concepts.clone()
    }

    fn descendants(&self, concept: ConceptId) -> BTreeSet<ConceptId> {
        let mut found = BTreeSet::new();
        let mut frontier = vec![concept];
        while let Some(parent) = frontier.pop() {
            if let Some(children) = self.children.get(&parent) {
                for &child in children {
                    if found.insert(child) {
                        frontier.push(child);
                    }
                }
            }
        }
        found.remove(&concept);
        found
    }

    fn stated_relationships(&self, concept: ConceptId) -> &[Relationship] {
        self.relationships.get(&concept).map(Vec::as_slice).unwrap_or(&[])
    }

    fn stated_datatypes(&self, concept: ConceptId) -> &[DatatypeProperty] {
        self.datatypes.get(&concept).map(Vec::as_slice).unwrap_or(&[])
    }

    fn is_primitive(&self, concept: ConceptId) -> bool {
        !self.fully_defined.contains(&concept)
    }

    fn preferred_label(&self, concept: ConceptId) -> Option<&str> {
        self.labels.get(&concept).map(String::as_str)
    }

    fn concept_axioms(&self, concept: ConceptId) -> &[Axiom] {
        self.asserted_axioms.get(&concept).map(Vec::as_slice).unwrap_or(&[])
    }
}
