use super::*;
use crate::document::Section;

/// `deps` is a space-separated id list.
fn document(specs: &[(&str, &str)]) -> Document {
    let sections = specs
        .iter()
        .map(|(id, deps)| {
            let mut section = Section::new(*id, id.to_uppercase(), "", 1);
            section.dependencies = deps.split_whitespace().map(String::from).collect();
            section
        })
        .collect();
    Document::new("test.tex", "").with_sections(sections).unwrap()
}

fn assert_dependencies_first(doc: &Document, order: &SectionOrder) {
    let position: HashMap<&str, usize> = order
        .ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();
    for section in doc.sections() {
        for dep in &section.dependencies {
            if let (Some(d), Some(s)) = (position.get(dep.as_str()), position.get(section.id.as_str())) {
                assert!(d < s, "{} must come before {}", dep, section.id);
            }
        }
    }
}

#[test]
fn test_intro_before_method() {
    let doc = segment_intro_method();
    let order = topological_order(&doc);
    let titles: Vec<_> = order.sections(&doc).iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Intro", "Method"]);
    assert_eq!(order.status, OrderStatus::Sorted);
}

fn segment_intro_method() -> Document {
    let mut doc = crate::segment::segment(
        "paper.tex",
        "\\section{Intro}\nWe introduce $x$.\n\\section{Method}\nUsing $x$ we proceed.",
    );
    let map = parse_dependency_response(r#"{"dependencies": {"sec_1": ["sec_0"]}}"#);
    apply_dependencies(&mut doc, &map);
    doc
}

#[test]
fn test_dependencies_reorder_sections() {
    let doc = document(&[("a", "c"), ("b", ""), ("c", "")]);
    let order = topological_order(&doc);
    assert_eq!(order.ids, vec!["b", "c", "a"]);
    assert_eq!(order.indices, vec![1, 2, 0]);
    assert_eq!(order.status, OrderStatus::Sorted);
    assert_dependencies_first(&doc, &order);
}

#[test]
fn test_diamond_is_valid_and_deterministic() {
    let doc = document(&[
        ("d", "b c"),
        ("b", "a"),
        ("c", "a"),
        ("a", ""),
    ]);
    let first = topological_order(&doc);
    assert_eq!(first.ids, vec!["a", "b", "c", "d"]);
    assert_dependencies_first(&doc, &first);
    assert_eq!(first, topological_order(&doc));
}

#[test]
fn test_no_edges_keeps_document_order() {
    let doc = document(&[("x", ""), ("y", ""), ("z", "")]);
    let order = topological_order(&doc);
    assert_eq!(order.ids, vec!["x", "y", "z"]);
    assert_eq!(order.status, OrderStatus::Unconstrained);
}

#[test]
fn test_cycle_falls_back_to_document_order() {
    let doc = document(&[("a", "b"), ("b", "a"), ("c", "")]);
    let order = topological_order(&doc);
    assert_eq!(order.ids, vec!["a", "b", "c"]);
    assert!(order.is_cycle_fallback());
    assert_eq!(
        order.status,
        OrderStatus::CycleDetected {
            unresolved: vec!["a".into(), "b".into()]
        }
    );
}

#[test]
fn test_sections_behind_a_cycle_are_unresolved() {
    let doc = document(&[("a", "b"), ("b", "a"), ("c", "a")]);
    let order = topological_order(&doc);
    assert_eq!(
        order.status,
        OrderStatus::CycleDetected {
            unresolved: vec!["a".into(), "b".into(), "c".into()]
        }
    );
}

#[test]
fn test_trivial_documents() {
    let empty = Document::new("e.tex", "");
    let order = topological_order(&empty);
    assert!(order.ids.is_empty());
    assert_eq!(order.status, OrderStatus::Trivial);

    let single = document(&[("only", "ghost")]);
    let order = topological_order(&single);
    assert_eq!(order.ids, vec!["only"]);
    assert_eq!(order.status, OrderStatus::Trivial);
}

#[test]
fn test_unknown_and_self_references_are_ignored() {
    let doc = document(&[("a", "a ghost"), ("b", "a")]);
    let graph = DependencyGraph::build(&doc);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.ignored().len(), 2);

    let order = topological_order(&doc);
    assert_eq!(order.ids, vec!["a", "b"]);
    assert_eq!(order.status, OrderStatus::Sorted);
    let reasons: Vec<_> = order.ignored.iter().map(|i| i.reason).collect();
    assert_eq!(reasons, vec![IgnoredReason::SelfReference, IgnoredReason::UnknownId]);
}

#[test]
fn test_status_serializes_with_kind_tag() {
    let doc = document(&[("a", "b"), ("b", "a")]);
    let json = serde_json::to_value(topological_order(&doc)).unwrap();
    assert_eq!(json["status"]["kind"], "cycle_detected");
    assert_eq!(json["status"]["unresolved"][1], "b");
}
