//! Theory vocabulary: the axiom shapes a build produces or consumes.
//!
//! Class axioms and property axioms generated from stated facts hold typed
//! concept identifiers. Property-chain and transitivity axioms arrive from a
//! parsed theory (the axiom reference set), so their property references are
//! kept as short-form text and only parsed during chain extraction.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::constants::{INTERNATIONAL_EDITION_URI, ONTOLOGY_URI_VERSION_POSTFIX};
use crate::domain::ConceptId;
use crate::expression::ClassExpression;

/// One axiom of the logical theory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Axiom {
    /// `sub ⊑ sup` — necessary conditions of a primitive concept.
    SubClassOf {
        sub: ClassExpression,
        sup: ClassExpression,
    },
    /// `left ≡ right` — necessary-and-sufficient definition.
    EquivalentClasses {
        left: ClassExpression,
        right: ClassExpression,
    },
    /// Object sub-property edge from the attribute-hierarchy pass.
    SubObjectPropertyOf { sub: ConceptId, sup: ConceptId },
    /// Data sub-property edge from the attribute-hierarchy pass.
    SubDataPropertyOf { sub: ConceptId, sup: ConceptId },
    /// `chain[0] o chain[1] ⊑ super_property`, as parsed from a theory.
    /// Property references are textual short forms until extraction.
    SubPropertyChainOf {
        chain: Vec<String>,
        super_property: String,
    },
    /// The property composes with itself.
    TransitiveObjectProperty { property: String },
    /// `rdfs:label` annotation carrying the concept's preferred term.
    Label { concept: ConceptId, label: String },
}

/// A completed theory: per-concept axiom sets plus the ontology identity.
///
/// Axioms are stored in `BTreeSet`s keyed by a `BTreeMap`, so set contents
/// alone determine serialization order and repeated builds of the same
/// taxonomy render byte-identical output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ontology {
    pub iri: String,
    pub version_date: Option<String>,
    pub axioms_by_concept: BTreeMap<ConceptId, BTreeSet<Axiom>>,
}

impl Ontology {
    pub fn new(iri: Option<&str>, version_date: Option<&str>) -> Self {
        Ontology {
            iri: iri.unwrap_or(INTERNATIONAL_EDITION_URI).to_string(),
            version_date: version_date.map(str::to_string),
            axioms_by_concept: BTreeMap::new(),
        }
    }

    /// Version IRI, present only for versioned builds.
    pub fn version_iri(&self) -> Option<String> {
        self.version_date
            .as_ref()
            .map(|date| format!("{}{}{}", self.iri, ONTOLOGY_URI_VERSION_POSTFIX, date))
    }

    pub fn insert(&mut self, concept: ConceptId, axiom: Axiom) {
        self.axioms_by_concept.entry(concept).or_default().insert(axiom);
    }

    /// All axioms, concepts ascending, axioms in canonical order per concept.
    pub fn axioms(&self) -> impl Iterator<Item = &Axiom> {
        self.axioms_by_concept.values().flatten()
    }

    pub fn axiom_count(&self) -> usize {
        self.axioms_by_concept.values().map(BTreeSet::len).sum()
    }
}
