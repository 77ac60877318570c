//! SNOMED CT stated-form → OWL axiom conversion core.
//!
//! Converts a terminology snapshot's relational fact base (concepts linked
//! by typed, grouped relationships and attribute-value facts) into a formal
//! theory of description-logic class axioms, and extracts property-chain
//! facts back out of a completed theory.
//!
//! The two cooperating pieces:
//!
//! - [`expression`] — builds one class expression from a concept's grouped
//!   facts, honoring group/ungrouped semantics (role groups, the
//!   ungrouped-attribute allow-list, bare `is a` parents).
//! - [`ontology`] — walks the whole taxonomy, decides subsumption vs.
//!   equivalence per concept, special-cases the attribute hierarchy, merges
//!   asserted axioms and label annotations, and extracts property chains.
//!
//! Loading release files, reasoner invocation, and byte output live in
//! collaborators; this crate only needs the [`taxonomy::Taxonomy`] queries
//! on one side and hands an [`axiom::Ontology`] (plus the functional-syntax
//! [`render`]) to the other.

pub mod axiom;
pub mod constants;
pub mod domain;
pub mod expression;
pub mod ontology;
pub mod render;
pub mod taxonomy;

pub use axiom::{Axiom, Ontology};
pub use domain::{
    AxiomRepresentation, AxiomSide, ConceptId, DatatypeProperty, LiteralType, PropertyChain,
    Relationship,
};
pub use expression::ClassExpression;
pub use ontology::{OntologyError, OntologyService};
pub use taxonomy::{Taxonomy, TaxonomySnapshot};
