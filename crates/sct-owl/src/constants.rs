//! Well-known SNOMED CT identifiers and namespace URIs.
//!
//! Everything the conversion special-cases lives here: the `is a` relationship
//! type, the concept-model attribute roots, and the role-group relation that
//! wraps grouped attribute-value facts.

use crate::domain::ConceptId;

/// `116680003 | is a |` — the subsumption relationship type.
pub const IS_A: ConceptId = 116_680_003;

/// `410662002 | concept model attribute |` — root of all attribute concepts.
pub const CONCEPT_MODEL_ATTRIBUTE: ConceptId = 410_662_002;

/// `762705008 | concept model object attribute |`.
///
/// Did not always exist: older release snapshots only have the generic
/// attribute root, so the attribute-hierarchy pass falls back to
/// [`CONCEPT_MODEL_ATTRIBUTE`] when this concept is absent.
pub const CONCEPT_MODEL_OBJECT_ATTRIBUTE: ConceptId = 762_705_008;

/// `762706009 | concept model data attribute |`.
pub const CONCEPT_MODEL_DATA_ATTRIBUTE: ConceptId = 762_706_009;

/// `609096000 | role group |` — the fixed relation wrapping role groups.
pub const ROLE_GROUP: ConceptId = 609_096_000;

/// `138875005 | SNOMED CT concept |` — the taxonomy root.
pub const SNOMED_ROOT: ConceptId = 138_875_005;

/// Default namespace for `:<sctid>` short forms.
pub const CORE_COMPONENTS_URI: &str = "http://snomed.info/id/";

/// Default ontology IRI when the caller does not supply one.
pub const INTERNATIONAL_EDITION_URI: &str = "http://snomed.info/sct/900000000000207008";

/// Appended (with a version date) to the ontology IRI for versioned builds.
pub const ONTOLOGY_URI_VERSION_POSTFIX: &str = "/version/";
