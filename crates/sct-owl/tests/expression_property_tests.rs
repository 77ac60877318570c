//! Property tests for the expression builder's grouping rules.

use std::collections::BTreeSet;

use proptest::prelude::*;
use sct_owl::constants::{IS_A, ROLE_GROUP};
use sct_owl::expression::build_class_expression;
use sct_owl::{AxiomSide, ClassExpression, ConceptId, Relationship};

fn sctid() -> impl Strategy<Value = ConceptId> {
    // Keep ids in a plausible SCTID range, away from the reserved ones.
    100_000u64..1_000_000_000u64
}

fn non_is_a_relationship() -> impl Strategy<Value = Relationship> {
    (0u32..4, sctid(), sctid()).prop_map(|(group, type_id, destination_id)| {
        Relationship::new(group, type_id, destination_id)
    })
}

fn relationships() -> impl Strategy<Value = Vec<Relationship>> {
    proptest::collection::vec(non_is_a_relationship(), 0..12)
}

fn build(facts: Vec<Relationship>) -> ClassExpression {
    build_class_expression(&AxiomSide::from_facts(facts, vec![]), &BTreeSet::new())
}

/// Every top-level term reachable from the result.
fn top_level_terms(expression: &ClassExpression) -> Vec<&ClassExpression> {
    match expression {
        ClassExpression::IntersectionOf { terms } => terms.iter().collect(),
        other => vec![other],
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn input_order_never_changes_the_expression(facts in relationships()) {
        let mut reversed = facts.clone();
        reversed.reverse();
        prop_assert_eq!(build(facts), build(reversed));
    }

    #[test]
    fn duplicating_facts_never_changes_the_expression(facts in relationships()) {
        let mut doubled = facts.clone();
        doubled.extend(facts.iter().cloned());
        prop_assert_eq!(build(facts), build(doubled));
    }

    #[test]
    fn non_allow_listed_group_zero_facts_are_always_wrapped(facts in relationships()) {
        let expression = build(facts);
        for term in top_level_terms(&expression) {
            // Without an allow-list, no bare existential may survive at the
            // top level: every non-`is a` fact sits inside a role group.
            if let ClassExpression::SomeValuesFrom { property, .. } = term {
                prop_assert_eq!(*property, ROLE_GROUP);
            }
            prop_assert!(
                !matches!(term, ClassExpression::DataHasValue { .. }),
                "no top-level DataHasValue term is allowed"
            );
        }
    }

    #[test]
    fn is_a_facts_never_appear_inside_role_groups(
        parents in proptest::collection::vec((0u32..4, sctid()), 1..4),
        others in relationships(),
    ) {
        let mut facts: Vec<Relationship> = parents
            .iter()
            .map(|&(group, destination)| Relationship::new(group, IS_A, destination))
            .collect();
        facts.extend(others);

        let expression = build(facts);
        for &(_, destination) in &parents {
            let named = ClassExpression::class(destination);
            prop_assert!(
                top_level_terms(&expression).contains(&&named),
                "parent {} must surface as a bare named class",
                destination
            );
        }
    }

    #[test]
    fn allow_listed_types_stay_bare_in_group_zero(type_id in sctid(), destination in sctid()) {
        let side = AxiomSide::from_facts(vec![Relationship::new(0, type_id, destination)], vec![]);
        let allow_list: BTreeSet<ConceptId> = [type_id].into_iter().collect();
        let expression = build_class_expression(&side, &allow_list);
        prop_assert_eq!(
            expression,
            ClassExpression::some(type_id, ClassExpression::class(destination))
        );
    }
}
