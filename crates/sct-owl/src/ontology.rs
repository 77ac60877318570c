//! Axiom assembler: walks a taxonomy snapshot and produces the full
//! per-concept theory, and extracts property-chain facts back out of a
//! completed theory.
//!
//! Theory construction is a pure fold over the immutable snapshot:
//!
//! 1. **Attribute hierarchy pass** — descendants of the concept-model
//!    attribute roots become sub-property axioms instead of class axioms.
//! 2. **Concept definition pass** — every remaining concept with stated
//!    facts gets a subsumption (primitive) or equivalence (fully defined)
//!    axiom built from its grouped facts. Concepts are independent here, so
//!    this pass fans out across rayon workers and merges per-worker results.
//! 3. **Label pass** — preferred terms become `rdfs:label` annotations.
//!
//! Directly-asserted axioms from the axiom reference set are merged into the
//! same per-concept sets, never generated here.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::axiom::{Axiom, Ontology};
use crate::constants::{
    CONCEPT_MODEL_ATTRIBUTE, CONCEPT_MODEL_DATA_ATTRIBUTE, CONCEPT_MODEL_OBJECT_ATTRIBUTE,
};
use crate::domain::{AxiomRepresentation, AxiomSide, ConceptId, PropertyChain};
use crate::expression::{build_class_expression, ClassExpression};
use crate::taxonomy::Taxonomy;

/// Fatal failures of one build or extraction call. There is no
/// partial-result recovery: callers treat a failed build as all-or-nothing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OntologyError {
    #[error("property chain must be 2 properties long, found {found}")]
    ChainLength { found: usize },

    #[error("property identifier is not a valid SCTID: {text:?}")]
    IdentifierFormat { text: String },
}

/// Converts stated facts into class and property axioms.
///
/// The ungrouped-attribute allow-list is injected once at construction and
/// read-only for every build made through this service.
#[derive(Debug, Clone, Default)]
pub struct OntologyService {
    ungrouped_attributes: BTreeSet<ConceptId>,
}

impl OntologyService {
    pub fn new(ungrouped_attributes: BTreeSet<ConceptId>) -> Self {
        OntologyService {
            ungrouped_attributes,
        }
    }

    /// Build the full theory with the default ontology IRI.
    pub fn build_theory<T: Taxonomy + Sync>(&self, taxonomy: &T) -> Ontology {
        self.build_theory_with_iri(taxonomy, None, None)
    }

    /// Build the full theory: generated axioms, merged asserted axioms, and
    /// label annotations, keyed per concept.
    pub fn build_theory_with_iri<T: Taxonomy + Sync>(
        &self,
        taxonomy: &T,
        ontology_iri: Option<&str>,
        version_date: Option<&str>,
    ) -> Ontology {
        let mut generated = self.axioms_from_stated_relationships(taxonomy);
        let mut ontology = Ontology::new(ontology_iri, version_date);

        for concept_id in taxonomy.all_concept_ids() {
            // Raw axioms from the axiom reference set.
            for axiom in taxonomy.concept_axioms(concept_id) {
                ontology.insert(concept_id, axiom.clone());
            }

            // Axioms generated from stated relationships.
            if let Some(axioms) = generated.remove(&concept_id) {
                for axiom in axioms {
                    ontology.insert(concept_id, axiom);
                }
            }

            // Label annotation; concepts without a resolvable label are
            // silently skipped.
            if let Some(label) = taxonomy.preferred_label(concept_id) {
                ontology.insert(
                    concept_id,
                    Axiom::Label {
                        concept: concept_id,
                        label: label.to_string(),
                    },
                );
            }
        }

        debug!(
            concepts = ontology.axioms_by_concept.len(),
            axioms = ontology.axiom_count(),
            "theory build complete"
        );
        ontology
    }

    /// Passes 1 and 2: property axioms for attribute concepts, class axioms
    /// for everything else with stated facts.
    pub fn axioms_from_stated_relationships<T: Taxonomy + Sync>(
        &self,
        taxonomy: &T,
    ) -> BTreeMap<ConceptId, BTreeSet<Axiom>> {
        let mut axioms_map: BTreeMap<ConceptId, BTreeSet<Axiom>> = BTreeMap::new();
        let all_concept_ids = taxonomy.all_concept_ids();

        // The concept-model object attribute concept did not always exist;
        // use the generic attribute root if it is absent, and in that case
        // also drop the destination exclusion below.
        let object_root_present = all_concept_ids.contains(&CONCEPT_MODEL_OBJECT_ATTRIBUTE);
        let object_root = if object_root_present {
            CONCEPT_MODEL_OBJECT_ATTRIBUTE
        } else {
            warn!(
                fallback = CONCEPT_MODEL_ATTRIBUTE,
                "concept model object attribute absent, walking the generic attribute root"
            );
            CONCEPT_MODEL_ATTRIBUTE
        };

        for attribute_id in taxonomy.descendants(object_root) {
            for relationship in taxonomy.stated_relationships(attribute_id) {
                if !relationship.is_is_a() {
                    continue;
                }
                // Skip the redundant edge up to the generic root, but only
                // while the more specific object-attribute root exists.
                if relationship.destination_id == CONCEPT_MODEL_ATTRIBUTE && object_root_present {
                    continue;
                }
                axioms_map.entry(attribute_id).or_default().insert(
                    Axiom::SubObjectPropertyOf {
                        sub: attribute_id,
                        sup: relationship.destination_id,
                    },
                );
            }
        }

        // Data attributes have no root-exclusion rule.
        if all_concept_ids.contains(&CONCEPT_MODEL_DATA_ATTRIBUTE) {
            for attribute_id in taxonomy.descendants(CONCEPT_MODEL_DATA_ATTRIBUTE) {
                for relationship in taxonomy.stated_relationships(attribute_id) {
                    if relationship.is_is_a() {
                        axioms_map.entry(attribute_id).or_default().insert(
                            Axiom::SubDataPropertyOf {
                                sub: attribute_id,
                                sup: relationship.destination_id,
                            },
                        );
                    }
                }
            }
        }

        // Attribute concepts already got property axioms; exclude them from
        // class definitions. Computed once, read-only for the whole pass.
        let attribute_ids = taxonomy.descendants(CONCEPT_MODEL_ATTRIBUTE);
        debug!(
            attributes = attribute_ids.len(),
            concepts = all_concept_ids.len(),
            "starting concept definition pass"
        );

        let concept_ids: Vec<ConceptId> = all_concept_ids.into_iter().collect();
        let class_axioms: Vec<(ConceptId, Axiom)> = concept_ids
            .par_iter()
            .filter_map(|&concept_id| {
                if attribute_ids.contains(&concept_id) {
                    return None;
                }
                let relationships = taxonomy.stated_relationships(concept_id);
                let datatypes = taxonomy.stated_datatypes(concept_id);
                if relationships.is_empty() && datatypes.is_empty() {
                    return None;
                }
                let representation = AxiomRepresentation {
                    primitive: taxonomy.is_primitive(concept_id),
                    left: AxiomSide::named(concept_id),
                    right: AxiomSide::from_facts(
                        relationships.iter().cloned(),
                        datatypes.iter().cloned(),
                    ),
                };
                Some((concept_id, self.class_axiom(&representation)))
            })
            .collect();

        for (concept_id, axiom) in class_axioms {
            axioms_map.entry(concept_id).or_default().insert(axiom);
        }
        axioms_map
    }

    /// Convert one representation into a class axiom. Primitive selects
    /// subsumption, fully defined selects equivalence; the sides are built
    /// identically either way.
    pub fn class_axiom(&self, representation: &AxiomRepresentation) -> Axiom {
        let left = self.class_expression(&representation.left);
        let right = self.class_expression(&representation.right);
        if representation.primitive {
            Axiom::SubClassOf {
                sub: left,
                sup: right,
            }
        } else {
            Axiom::EquivalentClasses { left, right }
        }
    }

    /// Build the class expression for one axiom side (see
    /// [`build_class_expression`]).
    pub fn class_expression(&self, side: &AxiomSide) -> ClassExpression {
        build_class_expression(side, &self.ungrouped_attributes)
    }

    /// Extract property-chain facts from a completed theory.
    ///
    /// Chained sub-properties must compose exactly two properties; a
    /// transitive property composes with itself.
    pub fn property_chains(
        &self,
        ontology: &Ontology,
    ) -> Result<BTreeSet<PropertyChain>, OntologyError> {
        let mut chains = BTreeSet::new();
        for axiom in ontology.axioms() {
            match axiom {
                Axiom::SubPropertyChainOf {
                    chain,
                    super_property,
                } => {
                    if chain.len() != 2 {
                        return Err(OntologyError::ChainLength { found: chain.len() });
                    }
                    chains.insert(PropertyChain::new(
                        parse_property_short_form(&chain[0])?,
                        parse_property_short_form(&chain[1])?,
                        parse_property_short_form(super_property)?,
                    ));
                }
                Axiom::TransitiveObjectProperty { property } => {
                    let property_id = parse_property_short_form(property)?;
                    chains.insert(PropertyChain::new(property_id, property_id, property_id));
                }
                _ => {}
            }
        }
        Ok(chains)
    }
}

/// Recover the numeric identifier from a property reference's short form.
/// Accepts a bare SCTID or an IRI / `:`-prefixed form, taking the final
/// segment.
fn parse_property_short_form(text: &str) -> Result<ConceptId, OntologyError> {
    let short_form = text.rsplit(&['/', '#', ':'][..]).next().unwrap_or(text);
    short_form
        .parse::<ConceptId>()
        .map_err(|_| OntologyError::IdentifierFormat {
            text: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::IS_A;
    use crate::domain::Relationship;
    use crate::taxonomy::TaxonomySnapshot;

    fn service() -> OntologyService {
        OntologyService::new(BTreeSet::new())
    }

    #[test]
    fn primitive_flag_changes_axiom_kind_only() {
        let facts = AxiomSide::from_facts(vec![Relationship::new(0, IS_A, 10)], vec![]);
        let primitive = service().class_axiom(&AxiomRepresentation {
            primitive: true,
            left: AxiomSide::named(1),
            right: facts.clone(),
        });
        let defined = service().class_axiom(&AxiomRepresentation {
            primitive: false,
            left: AxiomSide::named(1),
            right: facts,
        });

        let Axiom::SubClassOf { sub, sup } = primitive else {
            panic!("primitive concept must yield a subsumption axiom");
        };
        let Axiom::EquivalentClasses { left, right } = defined else {
            panic!("fully defined concept must yield an equivalence axiom");
        };
        assert_eq!(sub, left);
        assert_eq!(sup, right);
    }

    #[test]
    fn attribute_pass_skips_generic_root_edge_when_object_root_present() {
        let mut taxonomy = TaxonomySnapshot::new();
        taxonomy
            .add_relationship(
                CONCEPT_MODEL_OBJECT_ATTRIBUTE,
                Relationship::new(0, IS_A, CONCEPT_MODEL_ATTRIBUTE),
            )
            .add_relationship(
                363698007,
                Relationship::new(0, IS_A, CONCEPT_MODEL_OBJECT_ATTRIBUTE),
            )
            // Redundant extra parent straight up to the generic root.
            .add_relationship(363698007, Relationship::new(0, IS_A, CONCEPT_MODEL_ATTRIBUTE));

        let axioms = service().axioms_from_stated_relationships(&taxonomy);
        let attribute_axioms = &axioms[&363698007];
        assert_eq!(
            attribute_axioms.iter().collect::<Vec<_>>(),
            vec![&Axiom::SubObjectPropertyOf {
                sub: 363698007,
                sup: CONCEPT_MODEL_OBJECT_ATTRIBUTE,
            }]
        );
    }

    #[test]
    fn attribute_pass_falls_back_to_generic_root() {
        // Older snapshot: no 762705008. The generic root is walked and the
        // destination exclusion is relaxed.
        let mut taxonomy = TaxonomySnapshot::new();
        taxonomy.add_relationship(
            363698007,
            Relationship::new(0, IS_A, CONCEPT_MODEL_ATTRIBUTE),
        );

        let axioms = service().axioms_from_stated_relationships(&taxonomy);
        assert!(axioms[&363698007].contains(&Axiom::SubObjectPropertyOf {
            sub: 363698007,
            sup: CONCEPT_MODEL_ATTRIBUTE,
        }));
    }

    #[test]
    fn data_attribute_pass_emits_data_sub_properties() {
        let mut taxonomy = TaxonomySnapshot::new();
        taxonomy.add_relationship(
            3264475007,
            Relationship::new(0, IS_A, CONCEPT_MODEL_DATA_ATTRIBUTE),
        );

        let axioms = service().axioms_from_stated_relationships(&taxonomy);
        assert!(axioms[&3264475007].contains(&Axiom::SubDataPropertyOf {
            sub: 3264475007,
            sup: CONCEPT_MODEL_DATA_ATTRIBUTE,
        }));
    }

    #[test]
    fn attribute_concepts_do_not_receive_class_axioms() {
        let mut taxonomy = TaxonomySnapshot::new();
        taxonomy
            .add_relationship(
                CONCEPT_MODEL_OBJECT_ATTRIBUTE,
                Relationship::new(0, IS_A, CONCEPT_MODEL_ATTRIBUTE),
            )
            .add_relationship(
                363698007,
                Relationship::new(0, IS_A, CONCEPT_MODEL_OBJECT_ATTRIBUTE),
            );

        let axioms = service().axioms_from_stated_relationships(&taxonomy);
        for axiom in &axioms[&363698007] {
            assert!(
                matches!(axiom, Axiom::SubObjectPropertyOf { .. }),
                "attribute concept must only carry property axioms, got {axiom:?}"
            );
        }
    }

    #[test]
    fn two_element_chain_extracts_one_property_chain() {
        let mut ontology = Ontology::new(None, None);
        ontology.insert(
            363701004,
            Axiom::SubPropertyChainOf {
                chain: vec![":363701004".to_string(), ":738774007".to_string()],
                super_property: ":363701004".to_string(),
            },
        );

        let chains = service().property_chains(&ontology).unwrap();
        assert_eq!(
            chains.into_iter().collect::<Vec<_>>(),
            vec![PropertyChain::new(363701004, 738774007, 363701004)]
        );
    }

    #[test]
    fn three_element_chain_is_fatal() {
        let mut ontology = Ontology::new(None, None);
        ontology.insert(
            1,
            Axiom::SubPropertyChainOf {
                chain: vec![":1".to_string(), ":2".to_string(), ":3".to_string()],
                super_property: ":4".to_string(),
            },
        );

        assert_eq!(
            service().property_chains(&ontology),
            Err(OntologyError::ChainLength { found: 3 })
        );
    }

    #[test]
    fn unparsable_short_form_is_fatal() {
        let mut ontology = Ontology::new(None, None);
        ontology.insert(
            1,
            Axiom::TransitiveObjectProperty {
                property: ":roleGroup".to_string(),
            },
        );

        assert_eq!(
            service().property_chains(&ontology),
            Err(OntologyError::IdentifierFormat {
                text: ":roleGroup".to_string(),
            })
        );
    }

    #[test]
    fn transitive_property_composes_with_itself() {
        let mut ontology = Ontology::new(None, None);
        ontology.insert(
            116680003,
            Axiom::TransitiveObjectProperty {
                property: "116680003".to_string(),
            },
        );

        let chains = service().property_chains(&ontology).unwrap();
        assert!(chains.contains(&PropertyChain::new(116680003, 116680003, 116680003)));
    }

    #[test]
    fn short_forms_accept_iri_and_prefixed_spellings() {
        assert_eq!(
            parse_property_short_form("http://snomed.info/id/363698007").unwrap(),
            363698007
        );
        assert_eq!(parse_property_short_form(":363698007").unwrap(), 363698007);
        assert_eq!(parse_property_short_form("363698007").unwrap(), 363698007);
        assert!(parse_property_short_form("").is_err());
    }
}
