//! Fragment - an in-memory set of statements from one submission
//!
//! A fragment is created per request, mutated in place by each
//! pre-processing stage (type classification, blank-node resolution,
//! duplicate merging) and discarded once handed to the storage layer.
//!
//! Statements keep their submission order (first-seen order drives
//! canonical election in the duplicate merger); exact duplicates are
//! dropped on insert, so the fragment has set semantics.

use crate::statement::Statement;
use crate::term::{Iri, Term};
use serde::{Deserialize, Serialize};

/// An in-memory, not-yet-persisted set of statements
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    statements: Vec<Statement>,
}

impl Fragment {
    /// Create an empty fragment
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fragment from statements, dropping exact duplicates
    pub fn from_statements(statements: impl IntoIterator<Item = Statement>) -> Self {
        let mut fragment = Self::new();
        for st in statements {
            fragment.add(st);
        }
        fragment
    }

    /// Add a statement; duplicates are ignored. Returns true if added.
    pub fn add(&mut self, statement: Statement) -> bool {
        if self.statements.contains(&statement) {
            return false;
        }
        self.statements.push(statement);
        true
    }

    /// Number of statements
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// True if the fragment has no statements
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Iterate the statements in submission order
    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    /// Consume the fragment, yielding its statements
    pub fn into_statements(self) -> Vec<Statement> {
        self.statements
    }

    /// Distinct subjects, in first-seen order
    pub fn subjects(&self) -> Vec<Term> {
        let mut seen = Vec::new();
        for st in &self.statements {
            if !seen.contains(&st.s) {
                seen.push(st.s.clone());
            }
        }
        seen
    }

    /// Distinct objects, in first-seen order
    pub fn objects(&self) -> Vec<Term> {
        let mut seen = Vec::new();
        for st in &self.statements {
            if !seen.contains(&st.o) {
                seen.push(st.o.clone());
            }
        }
        seen
    }

    /// Statements matching the given pattern (`None` matches anything)
    pub fn filter<'a>(
        &'a self,
        s: Option<&'a Term>,
        p: Option<&'a Iri>,
        o: Option<&'a Term>,
    ) -> impl Iterator<Item = &'a Statement> {
        self.statements.iter().filter(move |st| {
            s.map_or(true, |s| &st.s == s)
                && p.map_or(true, |p| &st.p == p)
                && o.map_or(true, |o| &st.o == o)
        })
    }

    /// True if any statement matches the pattern
    pub fn contains(&self, s: Option<&Term>, p: Option<&Iri>, o: Option<&Term>) -> bool {
        self.filter(s, p, o).next().is_some()
    }

    /// All object values of (subject, predicate, ?)
    pub fn objects_of<'a>(&'a self, subject: &Term, predicate: &Iri) -> Vec<&'a Term> {
        self.statements
            .iter()
            .filter(|st| &st.s == subject && &st.p == predicate)
            .map(|st| &st.o)
            .collect()
    }

    /// First object value of (subject, predicate, ?), in submission order
    pub fn first_object<'a>(&'a self, subject: &Term, predicate: &Iri) -> Option<&'a Term> {
        self.statements
            .iter()
            .find(|st| &st.s == subject && &st.p == predicate)
            .map(|st| &st.o)
    }

    /// Statements that reference the term in object position
    pub fn referencing<'a>(&'a self, object: &'a Term) -> impl Iterator<Item = &'a Statement> {
        self.filter(None, None, Some(object))
    }

    /// Remove every statement with the given subject; returns removed count
    pub fn remove_subject(&mut self, subject: &Term) -> usize {
        let before = self.statements.len();
        self.statements.retain(|st| &st.s != subject);
        before - self.statements.len()
    }

    /// Replace every occurrence of `old` (subject or object position) with
    /// `new`; returns the number of statements touched.
    ///
    /// Rewrites that collapse onto an existing statement are deduplicated.
    pub fn rewrite(&mut self, old: &Term, new: &Term) -> usize {
        let mut touched = 0;
        let mut rewritten = Vec::with_capacity(self.statements.len());
        for st in self.statements.drain(..) {
            let next = if st.mentions(old) {
                touched += 1;
                st.rewritten(old, new)
            } else {
                st
            };
            if !rewritten.contains(&next) {
                rewritten.push(next);
            }
        }
        self.statements = rewritten;
        touched
    }
}

impl IntoIterator for Fragment {
    type Item = Statement;
    type IntoIter = std::vec::IntoIter<Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}

impl FromIterator<Statement> for Fragment {
    fn from_iter<I: IntoIterator<Item = Statement>>(iter: I) -> Self {
        Self::from_statements(iter)
    }
}
