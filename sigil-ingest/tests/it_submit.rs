//! End-to-end submission flow against the in-memory store

use futures::TryStreamExt;
use sigil_core::{
    AuthContext, EntityStore, Fragment, Iri, MemoryStore, SelectQuery, Statement, Term,
};
use sigil_ingest::{submit_fragment, IngestError, Pipeline};
use sigil_vocab::{local, rdf, rdfs, schema};

fn rdf_type() -> Iri {
    Iri::new(rdf::TYPE)
}

fn label() -> Iri {
    Iri::new(rdfs::LABEL)
}

fn video_with_term(video: &str, video_label: &str, child: &str) -> Vec<Statement> {
    let video = Term::blank(video);
    let child = Term::blank(child);
    vec![
        Statement::new(video.clone(), rdf_type(), Term::iri(schema::CREATIVE_WORK)),
        Statement::new(video.clone(), label(), Term::literal(video_label)),
        Statement::new(
            video,
            Iri::new("https://schema.org/hasDefinedTerm"),
            child.clone(),
        ),
        Statement::new(child.clone(), rdf_type(), Term::iri(schema::DEFINED_TERM)),
        Statement::new(child, label(), Term::literal("Term 1")),
    ]
}

#[tokio::test]
async fn shared_embedded_term_is_stored_once() {
    let store = MemoryStore::new();
    let pipeline = Pipeline::new();
    let ctx = AuthContext::user("tester");

    let mut statements = video_with_term("v1", "Video 1", "t1");
    statements.extend(video_with_term("v2", "Video 2", "t2"));
    let fragment = Fragment::from_statements(statements);

    let trx = submit_fragment(&store, &pipeline, fragment, &ctx)
        .await
        .unwrap();
    assert!(trx.is_success());

    // exactly one node carries (DefinedTerm, "Term 1")
    let term_nodes: Vec<Term> = store
        .query(
            SelectQuery::SubjectsMatching {
                entity_type: Iri::new(schema::DEFINED_TERM),
                property: label(),
                value: Term::literal("Term 1"),
            },
            &ctx,
        )
        .await
        .unwrap()
        .try_collect::<Vec<_>>()
        .await
        .unwrap()
        .into_iter()
        .filter_map(|row| row.get("id").cloned())
        .collect();
    assert_eq!(term_nodes.len(), 1);
    let term_node = &term_nodes[0];

    // both videos resolve to it
    let links = store
        .list_statements(
            None,
            Some(&Iri::new("https://schema.org/hasDefinedTerm")),
            Some(term_node),
            &ctx,
        )
        .await
        .unwrap();
    assert_eq!(links.len(), 2);

    // no blank node survived
    assert!(store
        .statements()
        .iter()
        .all(|st| !st.s.is_blank() && !st.o.is_blank()));
}

#[tokio::test]
async fn every_persisted_subject_carries_a_classification() {
    let store = MemoryStore::new();
    let pipeline = Pipeline::new();
    let ctx = AuthContext::user("tester");

    let fragment = Fragment::from_statements(video_with_term("v1", "Video 1", "t1"));
    submit_fragment(&store, &pipeline, fragment, &ctx)
        .await
        .unwrap();

    for subject in store
        .statements()
        .iter()
        .map(|st| st.s.clone())
        .collect::<std::collections::BTreeSet<_>>()
    {
        let classifications = store
            .list_statements(Some(&subject), Some(&rdf_type()), None, &ctx)
            .await
            .unwrap()
            .into_iter()
            .filter(|st| {
                st.o.as_iri()
                    .map(|iri| local::is_internal(iri.as_str()))
                    .unwrap_or(false)
            })
            .count();
        assert_eq!(classifications, 1, "subject {subject} misclassified");
    }
}

#[tokio::test]
async fn untyped_blank_node_rejects_the_whole_fragment() {
    let store = MemoryStore::new();
    let pipeline = Pipeline::new();
    let ctx = AuthContext::user("tester");

    let mut statements = video_with_term("v1", "Video 1", "t1");
    // an unreferenced blank with neither type nor characteristic property
    statements.push(Statement::new(
        Term::blank("stray"),
        Iri::new("https://example.com/vocab/color"),
        Term::literal("red"),
    ));
    let fragment = Fragment::from_statements(statements);

    let err = submit_fragment(&store, &pipeline, fragment, &ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::Unclassifiable { .. }));

    // zero statements persisted, no partial write
    assert!(store.is_empty());
}

#[tokio::test]
async fn resubmission_of_identical_content_is_idempotent_per_identifier() {
    let store = MemoryStore::new();
    let pipeline = Pipeline::new();
    let ctx = AuthContext::user("tester");

    submit_fragment(
        &store,
        &pipeline,
        Fragment::from_statements(video_with_term("v1", "Video 1", "t1")),
        &ctx,
    )
    .await
    .unwrap();
    let first = store.statements();

    submit_fragment(
        &store,
        &pipeline,
        Fragment::from_statements(video_with_term("v1", "Video 1", "t1")),
        &ctx,
    )
    .await
    .unwrap();

    // reproducible identifiers make the second submission collapse onto
    // the first: same subjects, same statements
    assert_eq!(store.statements(), first);
}
