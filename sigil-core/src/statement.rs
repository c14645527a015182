//! Statement - the fundamental data unit in sigil
//!
//! A statement is an immutable (subject, predicate, object) triple. Subjects
//! and objects are [`Term`]s; the predicate position is always an [`Iri`].

use crate::term::{Iri, Term};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single (subject, predicate, object) triple
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Statement {
    /// Subject (who/what the statement is about)
    pub s: Term,
    /// Predicate (the property/relationship)
    pub p: Iri,
    /// Object (the value or linked resource)
    pub o: Term,
}

impl Statement {
    /// Create a new statement
    pub fn new(s: impl Into<Term>, p: impl Into<Iri>, o: impl Into<Term>) -> Self {
        Self {
            s: s.into(),
            p: p.into(),
            o: o.into(),
        }
    }

    /// True if the statement mentions the term in subject or object position
    pub fn mentions(&self, term: &Term) -> bool {
        &self.s == term || &self.o == term
    }

    /// Copy of this statement with every occurrence of `old` (subject or
    /// object position) replaced by `new`
    pub fn rewritten(&self, old: &Term, new: &Term) -> Self {
        Self {
            s: if &self.s == old {
                new.clone()
            } else {
                self.s.clone()
            },
            p: self.p.clone(),
            o: if &self.o == old {
                new.clone()
            } else {
                self.o.clone()
            },
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.s, self.p, self.o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_replaces_both_positions() {
        let old = Term::blank("b0");
        let new = Term::iri("urn:sigil:e:ab12cd34ef56");

        let st = Statement::new(old.clone(), Iri::new("https://schema.org/name"), old.clone());
        let rewritten = st.rewritten(&old, &new);
        assert_eq!(rewritten.s, new);
        assert_eq!(rewritten.o, new);

        let untouched = Statement::new(
            Term::iri("urn:sigil:e:parent0000001"),
            Iri::new("https://schema.org/name"),
            Term::literal("x"),
        );
        assert_eq!(untouched.rewritten(&old, &new), untouched);
    }

    #[test]
    fn display_ntriples_like() {
        let st = Statement::new(
            Term::iri("urn:sigil:e:ab12cd34ef56"),
            Iri::new("http://www.w3.org/2000/01/rdf-schema#label"),
            Term::literal("Term 1"),
        );
        assert_eq!(
            format!("{}", st),
            "<urn:sigil:e:ab12cd34ef56> <http://www.w3.org/2000/01/rdf-schema#label> \"Term 1\" ."
        );
    }
}
