use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use recast::{Candidate, Converter, TypeDecl, TypeGraph, Value};

fn hierarchy() -> TypeGraph {
    TypeGraph::from_iter([
        TypeDecl::interface("Printable"),
        TypeDecl::class("Document").implements(["Printable"]),
        TypeDecl::class("Report").extends("Document"),
    ])
}

#[test]
fn exact_registrations_are_available() {
    let converter = Converter::new([Candidate::function("string", "int", |value| value)]);
    assert!(converter.is_available("string", "int").unwrap());
    assert!(!converter.is_available("string", "bool").unwrap());
    assert!(!converter.is_available("int", "int").unwrap());
}

#[test]
fn availability_walks_the_caller_named_hierarchy() {
    let converter = Converter::with_types(
        [Candidate::function("Document", "string", |_| Value::from("doc"))],
        hierarchy(),
    );

    assert!(converter.is_available("Report", "string").unwrap());
    assert!(converter.is_available("Document", "string").unwrap());
    assert!(!converter.is_available("Printable", "string").unwrap());
    assert!(!converter.is_available("Ghost", "string").unwrap());
}

#[test]
fn interface_inputs_probe_their_extends_chain() {
    let graph = TypeGraph::from_iter([
        TypeDecl::interface("Traversable"),
        TypeDecl::interface("Iterator").implements(["Traversable"]),
    ]);
    let converter = Converter::with_types(
        [Candidate::function("Traversable", "list", |value| {
            Value::List(vec![value])
        })],
        graph,
    );

    assert!(converter.is_available("Iterator", "list").unwrap());
}

#[test]
fn probing_never_invokes_a_converter() {
    let invocations = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&invocations);
    let converter = Converter::new([Candidate::function("string", "int", move |value| {
        seen.fetch_add(1, Ordering::SeqCst);
        value
    })]);

    assert!(converter.is_available("string", "int").unwrap());
    assert!(converter.is_available("string", "int").unwrap());
    assert_eq!(invocations.load(Ordering::SeqCst), 0);
}

#[test]
fn probing_is_read_only_across_repeated_calls() {
    let converter = Converter::with_types(
        [Candidate::function("Document", "string", |_| Value::from("doc"))],
        hierarchy(),
    );

    for _ in 0..3 {
        assert!(converter.is_available("Report", "string").unwrap());
        assert!(!converter.is_available("Report", "int").unwrap());
    }
}
