//! Blank-node resolution
//!
//! Rewrites the anonymous nodes of a fragment into deterministic local
//! identifiers, using the classification assigned in the previous stage.
//!
//! Seeds per classification:
//! - **Individual**: all externally-namespaced type values plus all
//!   characteristic-property values; an external type is required.
//! - **Classifier**: the same seed; the characteristic property is
//!   mandatory.
//! - **Embedded**: the predicate of the one statement referencing the node
//!   as object, plus all of the node's own outgoing object values.
//!   Including the referencing predicate keeps two structurally identical
//!   nested values under different relations from collapsing into one
//!   identifier.
//!
//! Objects recorded by an original-identifier bookkeeping statement are
//! preserved verbatim; so are reified statements. Classification is a
//! precondition, never re-derived here. All mappings are computed against
//! the unmodified fragment before any rewrite is applied.

use crate::error::{IngestError, Result};
use crate::schema::SchemaRegistry;
use crate::types::{classification_of, external_types, Classification};
use sigil_core::{Fragment, Iri, LocalId, Term};
use sigil_vocab::{local, rdf};
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Replacement of an anonymous identifier with a minted local identifier
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentifierMapping {
    /// The blank node that was replaced
    pub old: Term,
    /// The minted local identifier
    pub new: Iri,
}

/// Resolve every replaceable blank node of the fragment.
///
/// Returns the applied mappings; validation failures surface before the
/// fragment is touched.
pub fn resolve_anonymous(
    fragment: &mut Fragment,
    schema: &SchemaRegistry,
) -> Result<Vec<IdentifierMapping>> {
    let original_identifier = Iri::new(local::ORIGINAL_IDENTIFIER);
    let rdf_type = Iri::new(rdf::TYPE);
    let reified = Term::iri(rdf::STATEMENT);

    let mut blanks: Vec<Term> = Vec::new();
    for st in fragment.iter() {
        if st.p == original_identifier {
            continue;
        }
        if st.s.is_blank() && !blanks.contains(&st.s) {
            blanks.push(st.s.clone());
        }
        // objects stored as intermediate original ids must not be replaced
        if st.o.is_blank()
            && !fragment.contains(None, Some(&original_identifier), Some(&st.o))
            && !blanks.contains(&st.o)
        {
            blanks.push(st.o.clone());
        }
    }

    let mut mappings = Vec::new();
    for blank in &blanks {
        // reified statements keep their anonymous identifiers
        if fragment.contains(Some(blank), Some(&rdf_type), Some(&reified)) {
            continue;
        }
        let id = mint_identifier(fragment, blank, schema, &original_identifier)?;
        mappings.push(IdentifierMapping {
            old: blank.clone(),
            new: id.iri(),
        });
    }

    for mapping in &mappings {
        fragment.rewrite(&mapping.old, &Term::Iri(mapping.new.clone()));
        trace!(old = %mapping.old, new = %mapping.new, "anonymous identifier mapped");
    }
    if !mappings.is_empty() {
        debug!(
            count = mappings.len(),
            "replaced anonymous identifiers in incoming fragment"
        );
    }
    Ok(mappings)
}

fn mint_identifier(
    fragment: &Fragment,
    blank: &Term,
    schema: &SchemaRegistry,
    original_identifier: &Iri,
) -> Result<LocalId> {
    let classification = classification_of(fragment, blank).ok_or_else(|| {
        IngestError::MissingClassification {
            subject: blank.lexical().to_string(),
        }
    })?;

    let mut seed: Vec<String> = Vec::new();
    match classification {
        Classification::Individual | Classification::Classifier => {
            let types: BTreeSet<&str> = external_types(fragment, blank)
                .into_iter()
                .map(|iri| iri.as_str())
                .collect();
            if types.is_empty() {
                return Err(IngestError::MissingType {
                    subject: blank.lexical().to_string(),
                });
            }

            let characteristic_values: BTreeSet<&str> = fragment
                .filter(Some(blank), None, None)
                .filter(|st| schema.is_characteristic_property(&st.p))
                .map(|st| st.o.lexical())
                .collect();
            if classification == Classification::Classifier && characteristic_values.is_empty() {
                let named = types.into_iter().collect::<Vec<_>>().join(", ");
                return Err(IngestError::MissingCharacteristicProperty { entity_type: named });
            }

            seed.extend(types.into_iter().map(str::to_string));
            seed.extend(characteristic_values.into_iter().map(str::to_string));
            seed.sort();
        }
        Classification::Embedded => {
            let incoming = fragment
                .iter()
                .find(|st| &st.o == blank && st.p != *original_identifier)
                .ok_or_else(|| IngestError::UnreferencedEmbedded {
                    subject: blank.lexical().to_string(),
                })?;
            seed.push(incoming.p.as_str().to_string());

            // own outgoing object values; the same predicate may carry
            // several nested objects, so everything the node asserts counts
            let values: BTreeSet<&str> = fragment
                .filter(Some(blank), None, None)
                .map(|st| st.o.lexical())
                .collect();
            seed.extend(values.into_iter().map(str::to_string));
        }
    }

    Ok(LocalId::reproducible(local::ENTITIES, &seed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::assign_types;
    use sigil_core::Statement;
    use sigil_vocab::{rdfs, schema as sdo};

    fn rdf_type() -> Iri {
        Iri::new(rdf::TYPE)
    }

    fn term_fragment(parent_relation: &str) -> Fragment {
        let parent = Term::iri("https://example.com/videos/1");
        let child = Term::blank("b0");
        Fragment::from_statements([
            Statement::new(parent.clone(), rdf_type(), Term::iri(sdo::CREATIVE_WORK)),
            Statement::new(
                parent.clone(),
                Iri::new(rdfs::LABEL),
                Term::literal("Video 1"),
            ),
            Statement::new(parent, Iri::new(parent_relation), child.clone()),
            Statement::new(child.clone(), rdf_type(), Term::iri(sdo::DEFINED_TERM)),
            Statement::new(child, Iri::new(rdfs::LABEL), Term::literal("Term 1")),
        ])
    }

    fn resolved_child(fragment: &Fragment) -> Iri {
        fragment
            .iter()
            .find(|st| st.p == Iri::new(rdfs::LABEL) && st.o == Term::literal("Term 1"))
            .and_then(|st| st.s.as_iri().cloned())
            .expect("child was not resolved to an IRI")
    }

    #[test]
    fn resolution_is_deterministic_for_identical_content() {
        let registry = SchemaRegistry::new();

        let mut first = term_fragment("https://schema.org/hasDefinedTerm");
        assign_types(&mut first, &registry).unwrap();
        resolve_anonymous(&mut first, &registry).unwrap();

        let mut second = term_fragment("https://schema.org/hasDefinedTerm");
        assign_types(&mut second, &registry).unwrap();
        resolve_anonymous(&mut second, &registry).unwrap();

        assert_eq!(resolved_child(&first), resolved_child(&second));
        assert!(LocalId::conforms(&resolved_child(&first), local::ENTITIES));
    }

    #[test]
    fn no_blank_nodes_survive_resolution() {
        let registry = SchemaRegistry::new();
        let mut fragment = term_fragment("https://schema.org/hasDefinedTerm");
        assign_types(&mut fragment, &registry).unwrap();
        resolve_anonymous(&mut fragment, &registry).unwrap();

        assert!(fragment.iter().all(|st| !st.s.is_blank() && !st.o.is_blank()));
    }

    #[test]
    fn blank_without_classification_is_rejected() {
        let registry = SchemaRegistry::new();
        // classification deliberately not assigned
        let mut fragment = Fragment::from_statements([Statement::new(
            Term::blank("b0"),
            Iri::new(rdfs::LABEL),
            Term::literal("Term 1"),
        )]);

        let err = resolve_anonymous(&mut fragment, &registry).unwrap_err();
        assert!(matches!(err, IngestError::MissingClassification { .. }));
    }

    #[test]
    fn individual_without_external_type_is_rejected() {
        let registry = SchemaRegistry::new();
        let blank = Term::blank("b0");
        let mut fragment = Fragment::from_statements([
            Statement::new(
                blank.clone(),
                rdf_type(),
                Term::iri(local::TYPE_INDIVIDUAL),
            ),
            Statement::new(blank, Iri::new(rdfs::LABEL), Term::literal("x")),
        ]);

        let err = resolve_anonymous(&mut fragment, &registry).unwrap_err();
        assert!(matches!(err, IngestError::MissingType { .. }));
    }

    #[test]
    fn original_identifier_objects_are_preserved() {
        let registry = SchemaRegistry::new();
        let subject = Term::iri("urn:sigil:e:aaaaaaaaaaaa");
        let bookmark = Term::blank("src0");
        let mut fragment = Fragment::from_statements([
            Statement::new(subject.clone(), rdf_type(), Term::iri(sdo::PERSON)),
            Statement::new(
                subject.clone(),
                Iri::new(rdfs::LABEL),
                Term::literal("Ada"),
            ),
            Statement::new(
                subject.clone(),
                Iri::new(local::ORIGINAL_IDENTIFIER),
                bookmark.clone(),
            ),
        ]);
        assign_types(&mut fragment, &registry).unwrap();

        resolve_anonymous(&mut fragment, &registry).unwrap();
        assert!(fragment.contains(
            Some(&subject),
            Some(&Iri::new(local::ORIGINAL_IDENTIFIER)),
            Some(&bookmark)
        ));
    }

    #[test]
    fn embedded_seed_includes_the_referencing_predicate() {
        let registry = SchemaRegistry::new();

        // same nested content under two different relations must not
        // collapse into one identifier
        let make = |relation: &str| {
            let parent = Term::iri("https://example.com/things/1");
            let child = Term::blank("b0");
            let mut fragment = Fragment::from_statements([
                Statement::new(parent.clone(), rdf_type(), Term::iri(sdo::PERSON)),
                Statement::new(parent.clone(), Iri::new(rdfs::LABEL), Term::literal("Ada")),
                Statement::new(parent, Iri::new(relation), child.clone()),
                Statement::new(
                    child,
                    Iri::new("https://example.com/vocab/value"),
                    Term::literal("42"),
                ),
            ]);
            assign_types(&mut fragment, &registry).unwrap();
            let mappings = resolve_anonymous(&mut fragment, &registry).unwrap();
            mappings
                .into_iter()
                .find(|m| m.old == Term::blank("b0"))
                .map(|m| m.new)
                .expect("child mapping missing")
        };

        let via_home = make("https://example.com/vocab/homeAddress");
        let via_work = make("https://example.com/vocab/workAddress");
        assert_ne!(via_home, via_work);
    }
}
