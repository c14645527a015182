//! Registered vocabulary knowledge
//!
//! The classifier and the resolver need to know which external types denote
//! controlled-vocabulary terms, which denote regular individuals, and which
//! predicates are characteristic (distinguishing enough to seed identity
//! derivation). The registry ships with the defaults the service is
//! deployed with and can be extended per installation.

use sigil_core::Iri;
use sigil_vocab::{dc, dcterms, rdfs, schema, skos};
use std::collections::HashSet;

/// Registered classifier/individual types and characteristic properties
#[derive(Clone, Debug)]
pub struct SchemaRegistry {
    classifier_types: HashSet<Iri>,
    individual_types: HashSet<Iri>,
    characteristic_properties: HashSet<Iri>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self {
            classifier_types: [skos::CONCEPT, schema::DEFINED_TERM, schema::CATEGORY_CODE]
                .into_iter()
                .map(Iri::new)
                .collect(),
            individual_types: [
                schema::THING,
                schema::PERSON,
                schema::ORGANIZATION,
                schema::PLACE,
                schema::PRODUCT,
                schema::CREATIVE_WORK,
            ]
            .into_iter()
            .map(Iri::new)
            .collect(),
            characteristic_properties: [
                rdfs::LABEL,
                skos::PREF_LABEL,
                dc::IDENTIFIER,
                dcterms::IDENTIFIER,
                schema::IDENTIFIER,
                schema::NAME,
                schema::TITLE,
                schema::TERM_CODE,
            ]
            .into_iter()
            .map(Iri::new)
            .collect(),
        }
    }
}

impl SchemaRegistry {
    /// Registry with the default registrations
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the type denotes a controlled-vocabulary term
    pub fn is_classifier_type(&self, iri: &Iri) -> bool {
        self.classifier_types.contains(iri)
    }

    /// True if the type denotes a regular individual
    pub fn is_individual_type(&self, iri: &Iri) -> bool {
        self.individual_types.contains(iri)
    }

    /// True if the predicate is registered as characteristic
    pub fn is_characteristic_property(&self, iri: &Iri) -> bool {
        self.characteristic_properties.contains(iri)
    }

    /// True if the predicate's local name looks like a naming property
    /// (id/key/code), the heuristic fallback for unregistered vocabularies
    pub fn is_potential_characteristic_property(&self, iri: &Iri) -> bool {
        let local = iri.local_name().to_ascii_lowercase();
        local.contains("id") || local.contains("key") || local.contains("code")
    }

    /// Register an additional classifier type
    pub fn register_classifier_type(&mut self, iri: Iri) {
        self.classifier_types.insert(iri);
    }

    /// Register an additional individual type
    pub fn register_individual_type(&mut self, iri: Iri) {
        self.individual_types.insert(iri);
    }

    /// Register an additional characteristic property
    pub fn register_characteristic_property(&mut self, iri: Iri) {
        self.characteristic_properties.insert(iri);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registrations() {
        let registry = SchemaRegistry::new();
        assert!(registry.is_classifier_type(&Iri::new(skos::CONCEPT)));
        assert!(registry.is_individual_type(&Iri::new(schema::PERSON)));
        assert!(registry.is_characteristic_property(&Iri::new(rdfs::LABEL)));
        assert!(!registry.is_classifier_type(&Iri::new(schema::PERSON)));
    }

    #[test]
    fn naming_pattern_heuristic() {
        let registry = SchemaRegistry::new();
        assert!(registry.is_potential_characteristic_property(&Iri::new(
            "https://example.com/vocab/orderId"
        )));
        assert!(registry.is_potential_characteristic_property(&Iri::new(
            "https://example.com/vocab/termCode"
        )));
        assert!(!registry
            .is_potential_characteristic_property(&Iri::new("https://example.com/vocab/color")));
    }

    #[test]
    fn registrations_extend_the_defaults() {
        let mut registry = SchemaRegistry::new();
        let custom = Iri::new("https://example.com/vocab/Status");
        assert!(!registry.is_classifier_type(&custom));
        registry.register_classifier_type(custom.clone());
        assert!(registry.is_classifier_type(&custom));
    }
}
