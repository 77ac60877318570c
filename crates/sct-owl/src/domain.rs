//! Transient domain facts consumed and produced by one axiom build.
//!
//! The taxonomy owns its relationship and datatype fact collections; the
//! types here are value objects created fresh per construction call and
//! discarded once the theory has been produced. Equality and hashing are
//! value-based over every field, so callers can deduplicate with plain sets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::IS_A;

/// SNOMED CT concept identifier (SCTID).
pub type ConceptId = u64;

// ============================================================================
// Stated facts
// ============================================================================

/// A stated relationship: `(group, typeId, destinationId)` plus release
/// metadata owned by the taxonomy.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Relationship {
    pub group: u32,
    pub type_id: ConceptId,
    pub destination_id: ConceptId,
    pub module_id: ConceptId,
    pub effective_time: u32,
    pub uuid: Option<String>,
}

impl Relationship {
    pub fn new(group: u32, type_id: ConceptId, destination_id: ConceptId) -> Self {
        Relationship {
            group,
            type_id,
            destination_id,
            ..Default::default()
        }
    }

    /// `is a` facts are treated specially regardless of their stored group.
    pub fn is_is_a(&self) -> bool {
        self.type_id == IS_A
    }
}

/// Literal type tag carried by a datatype fact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LiteralType {
    Decimal,
    Integer,
    String,
    Boolean,
}

impl LiteralType {
    /// XSD short name used when rendering `"value"^^xsd:<name>`.
    pub fn xsd_name(&self) -> &'static str {
        match self {
            LiteralType::Decimal => "decimal",
            LiteralType::Integer => "integer",
            LiteralType::String => "string",
            LiteralType::Boolean => "boolean",
        }
    }
}

/// A stated attribute-value fact carrying a literal instead of a destination
/// concept. Structurally parallel to [`Relationship`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatatypeProperty {
    pub group: u32,
    pub type_id: ConceptId,
    pub value: String,
    pub datatype: LiteralType,
    pub module_id: ConceptId,
    pub effective_time: u32,
    pub uuid: Option<String>,
}

impl DatatypeProperty {
    pub fn new(group: u32, type_id: ConceptId, value: &str, datatype: LiteralType) -> Self {
        DatatypeProperty {
            group,
            type_id,
            value: value.to_string(),
            datatype,
            module_id: 0,
            effective_time: 0,
            uuid: None,
        }
    }
}

// ============================================================================
// Axiom representation
// ============================================================================

/// One side of an axiom to be built: either a named concept, used verbatim,
/// or the concept's stated facts grouped by role-group number.
///
/// The grouping maps are keyed by group number in a sorted container so
/// role-group emission order is ascending by group, independent of insertion
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum AxiomSide {
    Named {
        concept: ConceptId,
    },
    Expression {
        relationships: BTreeMap<u32, Vec<Relationship>>,
        datatypes: BTreeMap<u32, Vec<DatatypeProperty>>,
    },
}

impl AxiomSide {
    pub fn named(concept: ConceptId) -> Self {
        AxiomSide::Named { concept }
    }

    /// Group loose facts by their stored role-group number.
    pub fn from_facts(
        relationships: impl IntoIterator<Item = Relationship>,
        datatypes: impl IntoIterator<Item = DatatypeProperty>,
    ) -> Self {
        let mut relationship_map: BTreeMap<u32, Vec<Relationship>> = BTreeMap::new();
        for relationship in relationships {
            relationship_map
                .entry(relationship.group)
                .or_default()
                .push(relationship);
        }
        let mut datatype_map: BTreeMap<u32, Vec<DatatypeProperty>> = BTreeMap::new();
        for datatype in datatypes {
            datatype_map.entry(datatype.group).or_default().push(datatype);
        }
        AxiomSide::Expression {
            relationships: relationship_map,
            datatypes: datatype_map,
        }
    }
}

/// Side-neutral description of one class axiom to be built.
///
/// `primitive` selects the axiom kind only: subsumption for primitive
/// concepts, equivalence for fully defined ones. The sides are built the
/// same way either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxiomRepresentation {
    pub primitive: bool,
    pub left: AxiomSide,
    pub right: AxiomSide,
}

// ============================================================================
// Property chains
// ============================================================================

/// Derived fact: traversing `source_type` then `destination_type` along a
/// relationship path implies `inferred_type`. A transitive property `p`
/// yields the self-composing chain `(p, p, p)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PropertyChain {
    pub source_type: ConceptId,
    pub destination_type: ConceptId,
    pub inferred_type: ConceptId,
}

impl PropertyChain {
    pub fn new(
        source_type: ConceptId,
        destination_type: ConceptId,
        inferred_type: ConceptId,
    ) -> Self {
        PropertyChain {
            source_type,
            destination_type,
            inferred_type,
        }
    }
}
