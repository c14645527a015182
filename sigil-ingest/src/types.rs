//! Fragment-local type classification
//!
//! Every subject in an incoming fragment is labeled with exactly one
//! internal classification before identifiers are resolved:
//!
//! - **Classifier**: carries a registered controlled-vocabulary type. A
//!   characteristic property is mandatory; its absence is a hard
//!   validation failure naming the offending type.
//! - **Individual**: carries a registered individual type, or a
//!   characteristic (or naming-pattern) property while the Classifier rule
//!   did not match.
//! - **Embedded**: matches neither rule but appears as the object of some
//!   other statement (a nested value object).
//!
//! The Classifier check runs before the Individual check so vocabulary
//! terms are never misclassified. A subject matching none of the rules is
//! rejected; nothing from that fragment reaches the store.

use crate::error::{IngestError, Result};
use crate::schema::SchemaRegistry;
use sigil_core::{Fragment, Iri, Statement, Term};
use sigil_vocab::{local, rdf};
use tracing::{trace, warn};

/// The internal classification assigned to a fragment subject
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// Regular entity (document, person, work, ...)
    Individual,
    /// Controlled-vocabulary term
    Classifier,
    /// Nested value object, only reachable through its parent
    Embedded,
}

impl Classification {
    /// The internal type IRI for this classification
    pub fn iri(&self) -> Iri {
        match self {
            Classification::Individual => Iri::new(local::TYPE_INDIVIDUAL),
            Classification::Classifier => Iri::new(local::TYPE_CLASSIFIER),
            Classification::Embedded => Iri::new(local::TYPE_EMBEDDED),
        }
    }

    /// Parse an internal type IRI back into a classification
    pub fn from_iri(iri: &Iri) -> Option<Self> {
        match iri.as_str() {
            local::TYPE_INDIVIDUAL => Some(Classification::Individual),
            local::TYPE_CLASSIFIER => Some(Classification::Classifier),
            local::TYPE_EMBEDDED => Some(Classification::Embedded),
            _ => None,
        }
    }
}

/// The classification a fragment subject already carries, if any
pub fn classification_of(fragment: &Fragment, subject: &Term) -> Option<Classification> {
    let rdf_type = Iri::new(rdf::TYPE);
    fragment
        .objects_of(subject, &rdf_type)
        .into_iter()
        .filter_map(|o| o.as_iri())
        .find_map(Classification::from_iri)
}

/// External (non-internal) type values of a subject
pub fn external_types<'a>(fragment: &'a Fragment, subject: &'a Term) -> Vec<&'a Iri> {
    let rdf_type = Iri::new(rdf::TYPE);
    fragment
        .objects_of(subject, &rdf_type)
        .into_iter()
        .filter_map(|o| o.as_iri())
        .filter(|iri| !local::is_internal(iri.as_str()))
        .collect()
}

/// Label every subject of the fragment with exactly one classification.
///
/// Already-classified subjects are left untouched, so the pass is
/// idempotent.
pub fn assign_types(fragment: &mut Fragment, schema: &SchemaRegistry) -> Result<()> {
    let rdf_type = Iri::new(rdf::TYPE);

    for subject in fragment.subjects() {
        if classification_of(fragment, &subject).is_some() {
            continue;
        }

        let classification = classify(fragment, &subject, schema)?;
        trace!(subject = %subject, ?classification, "fragment subject classified");
        fragment.add(Statement::new(
            subject.clone(),
            rdf_type.clone(),
            Term::Iri(classification.iri()),
        ));
    }
    Ok(())
}

fn classify(
    fragment: &Fragment,
    subject: &Term,
    schema: &SchemaRegistry,
) -> Result<Classification> {
    if let Some(classifier_type) = registered_classifier_type(fragment, subject, schema) {
        // a vocabulary term without a characteristic property cannot seed
        // identity derivation
        if !has_characteristic_property(fragment, subject, schema) {
            return Err(IngestError::MissingCharacteristicProperty {
                entity_type: classifier_type.as_str().to_string(),
            });
        }
        return Ok(Classification::Classifier);
    }

    let individual = has_registered_individual_type(fragment, subject, schema)
        || has_characteristic_property(fragment, subject, schema)
        || has_naming_property(fragment, subject, schema);
    if individual {
        return Ok(Classification::Individual);
    }

    if fragment.referencing(subject).next().is_some() {
        return Ok(Classification::Embedded);
    }

    warn!(subject = %subject, "fragment subject matched no classification rule");
    Err(IngestError::Unclassifiable {
        subject: subject.lexical().to_string(),
    })
}

fn registered_classifier_type<'a>(
    fragment: &'a Fragment,
    subject: &'a Term,
    schema: &SchemaRegistry,
) -> Option<&'a Iri> {
    external_types(fragment, subject)
        .into_iter()
        .find(|iri| schema.is_classifier_type(iri))
}

fn has_registered_individual_type(
    fragment: &Fragment,
    subject: &Term,
    schema: &SchemaRegistry,
) -> bool {
    external_types(fragment, subject)
        .into_iter()
        .any(|iri| schema.is_individual_type(iri))
}

fn has_characteristic_property(
    fragment: &Fragment,
    subject: &Term,
    schema: &SchemaRegistry,
) -> bool {
    fragment
        .filter(Some(subject), None, None)
        .any(|st| schema.is_characteristic_property(&st.p))
}

fn has_naming_property(fragment: &Fragment, subject: &Term, schema: &SchemaRegistry) -> bool {
    fragment
        .filter(Some(subject), None, None)
        .any(|st| schema.is_potential_characteristic_property(&st.p))
}
