//! Class expression model and the expression builder.
//!
//! The builder turns one [`AxiomSide`] into a single [`ClassExpression`],
//! encoding the grouping rules exactly:
//!
//! - `is a` facts become bare named-class references, never role-grouped,
//!   whatever their stored group number says.
//! - Group-0 facts are self-grouped (wrapped in a singleton role group)
//!   unless their type is in the ungrouped-attribute allow-list, in which
//!   case the existential term stays bare.
//! - Facts sharing a nonzero group are collected per group and each group is
//!   wrapped, as a term or a conjunction, in exactly one role group.
//!
//! Term sets are `BTreeSet`s: conjunction is idempotent and commutative, and
//! the derived ordering makes rendering deterministic across runs.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::constants::ROLE_GROUP;
use crate::domain::{AxiomSide, ConceptId, LiteralType};

/// A description-logic class expression over named SNOMED CT concepts.
///
/// The derived `Ord` is the canonical term order used everywhere an
/// expression is rendered or stored in a set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassExpression {
    /// `owl:Thing`, the universal top concept.
    Thing,
    /// Reference to a named class.
    Class { concept: ConceptId },
    /// Existential restriction `property some filler`.
    SomeValuesFrom {
        property: ConceptId,
        filler: Box<ClassExpression>,
    },
    /// Literal-value restriction `property value "literal"^^type`.
    DataHasValue {
        property: ConceptId,
        value: String,
        datatype: LiteralType,
    },
    /// Unordered, deduplicated conjunction.
    IntersectionOf { terms: BTreeSet<ClassExpression> },
}

impl ClassExpression {
    pub fn class(concept: ConceptId) -> Self {
        ClassExpression::Class { concept }
    }

    pub fn some(property: ConceptId, filler: ClassExpression) -> Self {
        ClassExpression::SomeValuesFrom {
            property,
            filler: Box::new(filler),
        }
    }

    pub fn data_has_value(property: ConceptId, value: &str, datatype: LiteralType) -> Self {
        ClassExpression::DataHasValue {
            property,
            value: value.to_string(),
            datatype,
        }
    }

    /// Wrap a term in the fixed role-group existential.
    pub fn role_group(inner: ClassExpression) -> Self {
        ClassExpression::some(ROLE_GROUP, inner)
    }

    pub fn is_role_group(&self) -> bool {
        matches!(
            self,
            ClassExpression::SomeValuesFrom { property, .. } if *property == ROLE_GROUP
        )
    }
}

/// A set with one member is that member; anything else is a conjunction.
fn only_value_or_intersection(mut terms: BTreeSet<ClassExpression>) -> ClassExpression {
    if terms.len() == 1 {
        terms.pop_first().unwrap_or(ClassExpression::Thing)
    } else {
        ClassExpression::IntersectionOf { terms }
    }
}

/// Build the class expression for one axiom side.
///
/// A `Named` side is used verbatim; grouped facts are not consulted.
/// `ungrouped_attributes` is the immutable allow-list of attribute types
/// that bypass role-group wrapping when stated in group 0.
pub fn build_class_expression(
    side: &AxiomSide,
    ungrouped_attributes: &BTreeSet<ConceptId>,
) -> ClassExpression {
    let (relationships, datatypes) = match side {
        AxiomSide::Named { concept } => return ClassExpression::class(*concept),
        AxiomSide::Expression {
            relationships,
            datatypes,
        } => (relationships, datatypes),
    };

    let mut terms: BTreeSet<ClassExpression> = BTreeSet::new();
    let mut non_zero_role_groups: BTreeMap<u32, BTreeSet<ClassExpression>> = BTreeMap::new();

    for relationship in relationships.values().flatten() {
        let term = ClassExpression::some(
            relationship.type_id,
            ClassExpression::class(relationship.destination_id),
        );
        if relationship.is_is_a() {
            // Plain parent reference, never inside a role group.
            terms.insert(ClassExpression::class(relationship.destination_id));
        } else if relationship.group == 0 {
            if ungrouped_attributes.contains(&relationship.type_id) {
                // Special-cased attribute types stay bare.
                terms.insert(term);
            } else {
                // Self-grouped: group 0 still gets a singleton role group.
                terms.insert(ClassExpression::role_group(term));
            }
        } else {
            non_zero_role_groups
                .entry(relationship.group)
                .or_default()
                .insert(term);
        }
    }

    // Datatype facts follow the identical group-0 / group>0 policy. There is
    // no `is a` analogue for literals.
    for datatype in datatypes.values().flatten() {
        let term = ClassExpression::data_has_value(
            datatype.type_id,
            &datatype.value,
            datatype.datatype,
        );
        if datatype.group == 0 {
            if ungrouped_attributes.contains(&datatype.type_id) {
                terms.insert(term);
            } else {
                terms.insert(ClassExpression::role_group(term));
            }
        } else {
            non_zero_role_groups
                .entry(datatype.group)
                .or_default()
                .insert(term);
        }
    }

    // Each nonzero group becomes exactly one role group, ascending by group
    // number, wrapping the single term or the conjunction of the bucket.
    for (_, group_terms) in non_zero_role_groups {
        terms.insert(ClassExpression::role_group(only_value_or_intersection(
            group_terms,
        )));
    }

    if terms.is_empty() {
        // Concept with no stated facts at all: the taxonomy root.
        terms.insert(ClassExpression::Thing);
    }

    only_value_or_intersection(terms)
}
