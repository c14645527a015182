//! RDF Vocabulary Constants and Local Namespaces for Sigil
//!
//! This crate provides a centralized location for the vocabulary IRIs and
//! namespace strings used throughout the sigil engine.
//!
//! # Organization
//!
//! Constants are organized by vocabulary:
//! - `rdf` - RDF vocabulary (http://www.w3.org/1999/02/22-rdf-syntax-ns#)
//! - `rdfs` - RDFS vocabulary (http://www.w3.org/2000/01/rdf-schema#)
//! - `skos` - SKOS vocabulary (http://www.w3.org/2004/02/skos/core#)
//! - `dc` / `dcterms` - Dublin Core (elements and terms)
//! - `schema` - schema.org
//! - `local` - the namespaces this service mints identifiers in, plus the
//!   internal classification types
//! - `transactions` - the transaction provenance vocabulary

/// RDF vocabulary constants
pub mod rdf {
    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// rdf:Statement IRI (reified statements are never rewritten)
    pub const STATEMENT: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Statement";
}

/// RDFS vocabulary constants
pub mod rdfs {
    /// rdfs:label IRI
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

    /// rdfs:comment IRI
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
}

/// SKOS vocabulary constants
pub mod skos {
    /// skos:Concept IRI
    pub const CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";

    /// skos:prefLabel IRI
    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
}

/// Dublin Core elements vocabulary
pub mod dc {
    /// dc:identifier IRI
    pub const IDENTIFIER: &str = "http://purl.org/dc/elements/1.1/identifier";
}

/// Dublin Core terms vocabulary
pub mod dcterms {
    /// dcterms:identifier IRI
    pub const IDENTIFIER: &str = "http://purl.org/dc/terms/identifier";
}

/// schema.org vocabulary constants
pub mod schema {
    /// schema:Thing IRI
    pub const THING: &str = "https://schema.org/Thing";

    /// schema:Person IRI
    pub const PERSON: &str = "https://schema.org/Person";

    /// schema:Organization IRI
    pub const ORGANIZATION: &str = "https://schema.org/Organization";

    /// schema:Place IRI
    pub const PLACE: &str = "https://schema.org/Place";

    /// schema:Product IRI
    pub const PRODUCT: &str = "https://schema.org/Product";

    /// schema:CreativeWork IRI
    pub const CREATIVE_WORK: &str = "https://schema.org/CreativeWork";

    /// schema:VideoObject IRI
    pub const VIDEO_OBJECT: &str = "https://schema.org/VideoObject";

    /// schema:DefinedTerm IRI
    pub const DEFINED_TERM: &str = "https://schema.org/DefinedTerm";

    /// schema:DefinedTermSet IRI
    pub const DEFINED_TERM_SET: &str = "https://schema.org/DefinedTermSet";

    /// schema:CategoryCode IRI
    pub const CATEGORY_CODE: &str = "https://schema.org/CategoryCode";

    /// schema:identifier IRI
    pub const IDENTIFIER: &str = "https://schema.org/identifier";

    /// schema:name IRI
    pub const NAME: &str = "https://schema.org/name";

    /// schema:title IRI
    pub const TITLE: &str = "https://schema.org/title";

    /// schema:termCode IRI
    pub const TERM_CODE: &str = "https://schema.org/termCode";

    /// schema:url IRI
    pub const URL: &str = "https://schema.org/url";
}

/// Local namespaces: everything this service mints itself.
///
/// Identifiers minted here resolve under the service's own URN scheme. The
/// prefixes double as the routing keys for the responsible repository.
pub mod local {
    /// URN prefix shared by all local namespaces
    pub const URN_PREFIX: &str = "urn:sigil:";

    /// Namespace for entity identifiers
    pub const ENTITIES: &str = "urn:sigil:e:";

    /// Namespace for transaction identifiers
    pub const TRANSACTIONS: &str = "urn:sigil:t:";

    /// Internal type: a regular entity (document, person, work, ...)
    pub const TYPE_INDIVIDUAL: &str = "urn:sigil:e:Individual";

    /// Internal type: a controlled-vocabulary term
    pub const TYPE_CLASSIFIER: &str = "urn:sigil:e:Classifier";

    /// Internal type: a nested value object only reachable through its parent
    pub const TYPE_EMBEDDED: &str = "urn:sigil:e:Embedded";

    /// Bookkeeping predicate recording the identifier a resource carried
    /// before it was rewritten into the local namespace
    pub const ORIGINAL_IDENTIFIER: &str = "urn:sigil:int:srcid";

    /// Returns true if the IRI lives in one of the internal namespaces
    pub fn is_internal(iri: &str) -> bool {
        iri.starts_with(URN_PREFIX)
    }
}

/// Transaction provenance vocabulary.
///
/// Committed transactions are themselves described as graph data; these are
/// the predicates and status values used for that.
pub mod transactions {
    /// Type IRI for a transaction resource
    pub const TRANSACTION: &str = "https://w3id.org/sigil/trx#Transaction";

    /// Predicate: commit status of the transaction
    pub const STATUS: &str = "https://w3id.org/sigil/trx#status";

    /// Predicate: wall-clock time the transaction was created
    pub const AT: &str = "https://w3id.org/sigil/trx#at";

    /// Predicate: reason attached to a failed transaction
    pub const FAILURE_REASON: &str = "https://w3id.org/sigil/trx#reason";

    /// Status literal: transaction is still accumulating statements
    pub const RUNNING: &str = "running";

    /// Status literal: transaction was committed successfully
    pub const SUCCESS: &str = "success";

    /// Status literal: transaction failed during commit
    pub const FAILURE: &str = "failure";
}
