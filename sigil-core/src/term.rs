//! RDF term types: IRI, blank node, and literal
//!
//! Terms are the building blocks of statements. A term can be:
//! - An IRI (always expanded, never prefixed)
//! - A blank node (with an identifier that is only stable within one fragment)
//! - A literal (lexical value with optional language tag)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// An expanded IRI.
///
/// The namespace/local-name split follows the usual RDF convention: the
/// local name starts after the last `#`, `/` or `:` in the IRI.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Iri(Arc<str>);

impl Iri {
    /// Create an IRI from an expanded IRI string
    pub fn new(iri: impl AsRef<str>) -> Self {
        Self(Arc::from(iri.as_ref()))
    }

    /// The full IRI string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Byte position right after the last `#`, `/` or `:` separator
    fn split_pos(&self) -> usize {
        self.0
            .rfind(['#', '/', ':'])
            .map(|idx| idx + 1)
            .unwrap_or(0)
    }

    /// The namespace part, up to and including the last separator
    pub fn namespace(&self) -> &str {
        &self.0[..self.split_pos()]
    }

    /// The local name part, after the last separator
    pub fn local_name(&self) -> &str {
        &self.0[self.split_pos()..]
    }

    /// True if this IRI lives in the given namespace
    pub fn in_namespace(&self, namespace: &str) -> bool {
        self.namespace() == namespace
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl From<&str> for Iri {
    fn from(iri: &str) -> Self {
        Iri::new(iri)
    }
}

/// Blank node identifier.
///
/// Blank node IDs are stable within a fragment but have no meaning outside
/// of it; the anonymous-identifier resolver replaces them before anything
/// reaches the store. The label does NOT include the `_:` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlankId(Arc<str>);

impl BlankId {
    /// Create a blank node ID from a label (without the `_:` prefix)
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    /// Get the label (without `_:` prefix)
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// A literal value with an optional language tag.
///
/// The engine only ever compares and concatenates lexical forms, so the
/// literal keeps the lexical value as a string and leaves datatype handling
/// to the serialization layer it does not own.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    value: Arc<str>,
    language: Option<Arc<str>>,
}

impl Literal {
    /// Create a plain literal
    pub fn new(value: impl AsRef<str>) -> Self {
        Self {
            value: Arc::from(value.as_ref()),
            language: None,
        }
    }

    /// Create a language-tagged literal
    pub fn lang(value: impl AsRef<str>, language: impl AsRef<str>) -> Self {
        Self {
            value: Arc::from(value.as_ref()),
            language: Some(Arc::from(language.as_ref())),
        }
    }

    /// The lexical value
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The language tag, if any
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.value)?;
        if let Some(lang) = &self.language {
            write!(f, "@{}", lang)?;
        }
        Ok(())
    }
}

/// An RDF term (subject or object position of a statement)
///
/// # Invariants
///
/// - `Term::Iri` always contains an expanded IRI, never a prefixed form.
/// - The predicate position of a statement is an [`Iri`], not a `Term`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    /// Full expanded IRI
    Iri(Iri),
    /// Blank node, scoped to one fragment
    Blank(BlankId),
    /// Literal value
    Literal(Literal),
}

impl Term {
    /// Create an IRI term from an expanded IRI string
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Term::Iri(Iri::new(iri))
    }

    /// Create a blank node term
    pub fn blank(label: impl AsRef<str>) -> Self {
        Term::Blank(BlankId::new(label))
    }

    /// Create a plain literal term
    pub fn literal(value: impl AsRef<str>) -> Self {
        Term::Literal(Literal::new(value))
    }

    /// Check if this is an IRI term
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    /// Check if this is a blank node
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }

    /// Check if this is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// Check if this is a resource (IRI or blank node)
    pub fn is_resource(&self) -> bool {
        !self.is_literal()
    }

    /// Try to get as IRI
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Try to get as blank node ID
    pub fn as_blank(&self) -> Option<&BlankId> {
        match self {
            Term::Blank(id) => Some(id),
            _ => None,
        }
    }

    /// Try to get as literal
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// The lexical form of the term: the IRI string, the blank label, or
    /// the literal value. This is what identifier seeds are built from.
    pub fn lexical(&self) -> &str {
        match self {
            Term::Iri(iri) => iri.as_str(),
            Term::Blank(id) => id.as_str(),
            Term::Literal(lit) => lit.as_str(),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => iri.fmt(f),
            Term::Blank(id) => id.fmt(f),
            Term::Literal(lit) => lit.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iri_namespace_split() {
        let hash = Iri::new("http://www.w3.org/2000/01/rdf-schema#label");
        assert_eq!(hash.namespace(), "http://www.w3.org/2000/01/rdf-schema#");
        assert_eq!(hash.local_name(), "label");

        let slash = Iri::new("https://schema.org/Person");
        assert_eq!(slash.namespace(), "https://schema.org/");
        assert_eq!(slash.local_name(), "Person");

        let urn = Iri::new("urn:sigil:e:ab12cd34ef56");
        assert_eq!(urn.namespace(), "urn:sigil:e:");
        assert_eq!(urn.local_name(), "ab12cd34ef56");
    }

    #[test]
    fn term_constructors() {
        let iri = Term::iri("https://schema.org/Person");
        assert!(iri.is_iri());
        assert!(iri.is_resource());

        let blank = Term::blank("b0");
        assert!(blank.is_blank());
        assert!(blank.is_resource());
        assert_eq!(blank.lexical(), "b0");

        let lit = Term::literal("Video 1");
        assert!(lit.is_literal());
        assert!(!lit.is_resource());
        assert_eq!(lit.lexical(), "Video 1");
    }

    #[test]
    fn term_display() {
        assert_eq!(
            format!("{}", Term::iri("https://schema.org/Person")),
            "<https://schema.org/Person>"
        );
        assert_eq!(format!("{}", Term::blank("b0")), "_:b0");
        assert_eq!(format!("{}", Term::literal("hello")), "\"hello\"");
        assert_eq!(
            format!("{}", Term::Literal(Literal::lang("bonjour", "fr"))),
            "\"bonjour\"@fr"
        );
    }
}
