//! Intra-batch duplicate merging
//!
//! Checks whether duplicates exist within one incoming fragment. Duplicates
//! already persisted by earlier submissions are NOT checked here; that is
//! the scheduled cross-batch detector's job.
//!
//! Two entities are considered duplicates when they share the same external
//! type and the same label. Pass 1 converges anonymous (blank or locally
//! minted) linked entities inside the fragment: the first occurrence wins,
//! later ones are removed and every link to them is rerouted. Pass 2 would
//! cross-check fully-named linked entities against the persisted store; it
//! deliberately performs no work and only reports that named entities were
//! seen — the reconciliation is deferred to the scheduled detector.

use sigil_core::{Fragment, Iri, LocalId, Term};
use sigil_vocab::{local, rdf, rdfs};
use tracing::{debug, trace};

/// Converge duplicate anonymous linked entities within the fragment.
///
/// Returns the number of duplicates removed. A linked entity without a
/// type or without a label is skipped, not an error. The fragment's
/// statement count never grows.
pub fn merge_anonymous(fragment: &mut Fragment) -> usize {
    let rdf_type = Iri::new(rdf::TYPE);
    let label_property = Iri::new(rdfs::LABEL);

    let candidates: Vec<Term> = fragment
        .objects()
        .into_iter()
        .filter(is_anonymous)
        .collect();
    if candidates.is_empty() {
        return 0;
    }

    // first occurrence of a (type, label) pair becomes canonical
    let mut seen: Vec<(Iri, Term, Term)> = Vec::new();
    let mut merged = 0;

    for node in candidates {
        let Some(entity_type) = first_external_type(fragment, &node, &rdf_type) else {
            continue;
        };
        let Some(label) = fragment.first_object(&node, &label_property).cloned() else {
            continue;
        };

        match seen
            .iter()
            .find(|(t, l, _)| *t == entity_type && *l == label)
        {
            Some((_, _, canonical)) => {
                let canonical = canonical.clone();
                reroute(fragment, &node, &canonical);
                merged += 1;
            }
            None => seen.push((entity_type, label, node)),
        }
    }

    if merged > 0 {
        debug!(merged, "converged duplicate linked entities within fragment");
    }
    merged
}

/// Pass 2: named linked entities.
///
/// Cross-checking a fully-named linked entity against the persisted store
/// is deferred to the scheduled cross-batch detector; this pass only
/// observes. Returns true if the fragment links any named entity.
pub fn merge_named(fragment: &Fragment) -> bool {
    let named = fragment.objects().into_iter().any(|o| {
        o.as_iri()
            .map(|iri| !LocalId::conforms(iri, local::ENTITIES))
            .unwrap_or(false)
    });
    if named {
        trace!("fragment links named entities; store-side duplicate check left to the scheduled detector");
    }
    named
}

/// Remove the duplicate's own statements and reroute every link to it onto
/// the canonical node.
fn reroute(fragment: &mut Fragment, duplicate: &Term, canonical: &Term) {
    debug!(duplicate = %duplicate, canonical = %canonical, "rerouting links to duplicate");
    fragment.remove_subject(duplicate);
    fragment.rewrite(duplicate, canonical);
}

fn is_anonymous(term: &Term) -> bool {
    match term {
        Term::Blank(_) => true,
        Term::Iri(iri) => LocalId::conforms(iri, local::ENTITIES),
        Term::Literal(_) => false,
    }
}

fn first_external_type(fragment: &Fragment, node: &Term, rdf_type: &Iri) -> Option<Iri> {
    fragment
        .objects_of(node, rdf_type)
        .into_iter()
        .filter_map(|o| o.as_iri())
        .find(|iri| !local::is_internal(iri.as_str()))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigil_core::Statement;
    use sigil_vocab::schema as sdo;

    fn rdf_type() -> Iri {
        Iri::new(rdf::TYPE)
    }

    fn label() -> Iri {
        Iri::new(rdfs::LABEL)
    }

    fn linked_term(parent: &str, child: &str) -> Vec<Statement> {
        let parent = Term::iri(parent);
        let child = Term::blank(child);
        vec![
            Statement::new(parent.clone(), rdf_type(), Term::iri(sdo::VIDEO_OBJECT)),
            Statement::new(
                parent,
                Iri::new("https://schema.org/hasDefinedTerm"),
                child.clone(),
            ),
            Statement::new(child.clone(), rdf_type(), Term::iri(sdo::DEFINED_TERM)),
            Statement::new(child, label(), Term::literal("Term 1")),
        ]
    }

    #[test]
    fn duplicate_linked_entities_converge_onto_first_seen() {
        let mut statements = linked_term("https://example.com/videos/1", "t1");
        statements.extend(linked_term("https://example.com/videos/2", "t2"));
        let mut fragment = Fragment::from_statements(statements);
        let before = fragment.len();

        assert_eq!(merge_anonymous(&mut fragment), 1);
        assert!(fragment.len() < before);

        // exactly one (type, label) node remains and both parents link to it
        let survivors: Vec<_> = fragment
            .filter(None, Some(&label()), Some(&Term::literal("Term 1")))
            .map(|st| st.s.clone())
            .collect();
        assert_eq!(survivors, vec![Term::blank("t1")]);

        for parent in ["https://example.com/videos/1", "https://example.com/videos/2"] {
            assert!(fragment.contains(
                Some(&Term::iri(parent)),
                Some(&Iri::new("https://schema.org/hasDefinedTerm")),
                Some(&Term::blank("t1"))
            ));
        }
        assert!(!fragment.contains(None, None, Some(&Term::blank("t2"))));
        assert!(!fragment.contains(Some(&Term::blank("t2")), None, None));
    }

    #[test]
    fn distinct_labels_are_kept_apart() {
        let mut statements = linked_term("https://example.com/videos/1", "t1");
        let other = Term::blank("t2");
        statements.push(Statement::new(
            Term::iri("https://example.com/videos/1"),
            Iri::new("https://schema.org/hasDefinedTerm"),
            other.clone(),
        ));
        statements.push(Statement::new(other.clone(), rdf_type(), Term::iri(sdo::DEFINED_TERM)));
        statements.push(Statement::new(other, label(), Term::literal("Term 2")));
        let mut fragment = Fragment::from_statements(statements);

        assert_eq!(merge_anonymous(&mut fragment), 0);
    }

    #[test]
    fn nodes_without_label_are_skipped() {
        let parent = Term::iri("https://example.com/videos/1");
        let child = Term::blank("t1");
        let mut fragment = Fragment::from_statements([
            Statement::new(
                parent,
                Iri::new("https://schema.org/hasDefinedTerm"),
                child.clone(),
            ),
            Statement::new(child, rdf_type(), Term::iri(sdo::DEFINED_TERM)),
        ]);
        assert_eq!(merge_anonymous(&mut fragment), 0);
    }

    #[test]
    fn named_pass_reports_without_rewriting() {
        let mut fragment = Fragment::from_statements(linked_term("https://example.com/videos/1", "t1"));
        let snapshot = fragment.clone();

        assert!(merge_named(&fragment));
        assert_eq!(fragment, snapshot);

        // replace the named parent reference with a literal-only fragment
        fragment = Fragment::from_statements([Statement::new(
            Term::blank("t1"),
            label(),
            Term::literal("x"),
        )]);
        assert!(!merge_named(&fragment));
    }
}
