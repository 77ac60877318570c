//! OWL functional-syntax rendering of a completed theory.
//!
//! Every named term is rendered as `:<sctid>` under the fixed default
//! prefix `http://snomed.info/id/`; the role-group relation is the single
//! well-known `:609096000`. Output is deterministic: concepts ascending,
//! axioms in canonical order within each concept, intersection children in
//! canonical term order.

use std::fmt::Write as _;
use std::io;

use crate::axiom::{Axiom, Ontology};
use crate::constants::CORE_COMPONENTS_URI;
use crate::domain::ConceptId;
use crate::expression::ClassExpression;

/// Render the whole theory to a functional-syntax document.
pub fn ontology_to_functional_syntax(ontology: &Ontology) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Prefix(:=<{CORE_COMPONENTS_URI}>)");
    let _ = writeln!(out, "Prefix(owl:=<http://www.w3.org/2002/07/owl#>)");
    let _ = writeln!(out, "Prefix(rdfs:=<http://www.w3.org/2000/01/rdf-schema#>)");
    let _ = writeln!(out, "Prefix(xsd:=<http://www.w3.org/2001/XMLSchema#>)");
    out.push('\n');
    match ontology.version_iri() {
        Some(version_iri) => {
            let _ = writeln!(out, "Ontology(<{}> <{}>", ontology.iri, version_iri);
        }
        None => {
            let _ = writeln!(out, "Ontology(<{}>", ontology.iri);
        }
    }
    for axiom in ontology.axioms() {
        out.push_str(&render_axiom(axiom));
        out.push('\n');
    }
    out.push_str(")\n");
    out
}

/// Stream the document to a writer; byte-identical to
/// [`ontology_to_functional_syntax`].
pub fn write_ontology<W: io::Write>(ontology: &Ontology, writer: &mut W) -> io::Result<()> {
    writer.write_all(ontology_to_functional_syntax(ontology).as_bytes())
}

pub fn render_axiom(axiom: &Axiom) -> String {
    match axiom {
        Axiom::SubClassOf { sub, sup } => {
            format!("SubClassOf({} {})", render_expression(sub), render_expression(sup))
        }
        Axiom::EquivalentClasses { left, right } => format!(
            "EquivalentClasses({} {})",
            render_expression(left),
            render_expression(right)
        ),
        Axiom::SubObjectPropertyOf { sub, sup } => {
            format!("SubObjectPropertyOf({} {})", short_form(*sub), short_form(*sup))
        }
        Axiom::SubDataPropertyOf { sub, sup } => {
            format!("SubDataPropertyOf({} {})", short_form(*sub), short_form(*sup))
        }
        Axiom::SubPropertyChainOf {
            chain,
            super_property,
        } => {
            let rendered: Vec<String> = chain.iter().map(|p| property_ref(p)).collect();
            format!(
                "SubObjectPropertyOf(ObjectPropertyChain({}) {})",
                rendered.join(" "),
                property_ref(super_property)
            )
        }
        Axiom::TransitiveObjectProperty { property } => {
            format!("TransitiveObjectProperty({})", property_ref(property))
        }
        Axiom::Label { concept, label } => format!(
            "AnnotationAssertion(rdfs:label <{CORE_COMPONENTS_URI}{concept}> \"{}\")",
            escape_literal(label)
        ),
    }
}

pub fn render_expression(expression: &ClassExpression) -> String {
    match expression {
        ClassExpression::Thing => "owl:Thing".to_string(),
        ClassExpression::Class { concept } => short_form(*concept),
        ClassExpression::SomeValuesFrom { property, filler } => format!(
            "ObjectSomeValuesFrom({} {})",
            short_form(*property),
            render_expression(filler)
        ),
        ClassExpression::DataHasValue {
            property,
            value,
            datatype,
        } => format!(
            "DataHasValue({} \"{}\"^^xsd:{})",
            short_form(*property),
            escape_literal(value),
            datatype.xsd_name()
        ),
        ClassExpression::IntersectionOf { terms } => {
            let rendered: Vec<String> = terms.iter().map(render_expression).collect();
            format!("ObjectIntersectionOf({})", rendered.join(" "))
        }
    }
}

fn short_form(concept: ConceptId) -> String {
    format!(":{concept}")
}

/// Parsed-theory property references may already carry a prefix or IRI;
/// bare SCTIDs get the default prefix.
fn property_ref(text: &str) -> String {
    if text.chars().all(|c| c.is_ascii_digit()) && !text.is_empty() {
        format!(":{text}")
    } else {
        text.to_string()
    }
}

fn escape_literal(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LiteralType;

    #[test]
    fn renders_nested_role_group_expression() {
        let expression = ClassExpression::role_group(ClassExpression::some(
            363698007,
            ClassExpression::class(12345),
        ));
        assert_eq!(
            render_expression(&expression),
            "ObjectSomeValuesFrom(:609096000 ObjectSomeValuesFrom(:363698007 :12345))"
        );
    }

    #[test]
    fn renders_data_has_value_with_xsd_tag() {
        let expression = ClassExpression::data_has_value(3264475007, "250", LiteralType::Decimal);
        assert_eq!(
            render_expression(&expression),
            "DataHasValue(:3264475007 \"250\"^^xsd:decimal)"
        );
    }

    #[test]
    fn renders_property_chain_axiom() {
        let axiom = Axiom::SubPropertyChainOf {
            chain: vec!["363701004".to_string(), "738774007".to_string()],
            super_property: "363701004".to_string(),
        };
        assert_eq!(
            render_axiom(&axiom),
            "SubObjectPropertyOf(ObjectPropertyChain(:363701004 :738774007) :363701004)"
        );
    }

    #[test]
    fn escapes_label_text() {
        let axiom = Axiom::Label {
            concept: 73211009,
            label: "Diabetes \"mellitus\"".to_string(),
        };
        assert_eq!(
            render_axiom(&axiom),
            "AnnotationAssertion(rdfs:label <http://snomed.info/id/73211009> \"Diabetes \\\"mellitus\\\"\")"
        );
    }

    #[test]
    fn document_has_prefix_header_and_ontology_wrapper() {
        let ontology = Ontology::new(None, Some("20260131"));
        let document = ontology_to_functional_syntax(&ontology);
        assert!(document.starts_with("Prefix(:=<http://snomed.info/id/>)"));
        assert!(document.contains(
            "Ontology(<http://snomed.info/sct/900000000000207008> \
             <http://snomed.info/sct/900000000000207008/version/20260131>"
        ));
        assert!(document.trim_end().ends_with(')'));
    }
}
