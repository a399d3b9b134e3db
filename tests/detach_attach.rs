mod common;

use common::fixtures::{TestEdge, TestHost, TestVertex};
use pathloom::element::{AttachError, AttachTarget, EntityId, Host};
use pathloom::side_effects::SideEffects;
use pathloom::traverser::{DetachedTraverser, Traverser};
use pathloom::types::Destination;
use pathloom::value::TraversalValue;
use serde_json::json;

fn populated_host() -> TestHost {
    let mut host = TestHost::new(1);
    host.add_vertex(TestVertex::new(1, "person").with_prop("name", json!("marko")));
    host.add_vertex(TestVertex::new(2, "person").with_prop("name", json!("vadas")));
    host.add_edge(TestEdge::new(7, "knows", 1, 2).with_prop("weight", json!(0.5)));
    host
}

#[test]
fn detach_attach_round_trip_preserves_observable_state() {
    let host = populated_host();
    let vertex = host.vertex(&EntityId::Int(1)).unwrap();

    let mut seed = Traverser::new(
        TraversalValue::Int(5),
        Destination::step("out"),
        SideEffects::shared(),
    );
    seed.set_sack(TraversalValue::Int(3));

    // Position the traverser at the vertex, recording it in the path.
    let mut t = seed
        .admin()
        .split_with("v", TraversalValue::Vertex(vertex));
    t.admin().incr_loops();
    t.admin().set_bulk(4).unwrap();

    let expected_value = t.value().clone();
    let expected_loops = t.loops();
    let expected_bulk = t.bulk();
    let expected_path = t.path().clone();
    let expected_sack = t.sack().cloned();
    let expected_destination = t.destination().clone();

    let detached = t.detach();

    // A structurally-equivalent host on the receiving side.
    let receiving = populated_host();
    let attached = detached
        .attach(&AttachTarget::Entity(&receiving))
        .unwrap();

    assert_eq!(attached.value(), &expected_value);
    assert_eq!(attached.loops(), expected_loops);
    assert_eq!(attached.bulk(), expected_bulk);
    assert_eq!(attached.path(), &expected_path);
    assert_eq!(attached.sack(), expected_sack.as_ref());
    assert_eq!(attached.destination(), &expected_destination);
}

#[test]
fn detached_traverser_holds_no_live_references_and_serializes() {
    let host = populated_host();
    let vertex = host.vertex(&EntityId::Int(1)).unwrap();
    let edge = host.edge(&EntityId::Int(7)).unwrap();

    let mut t = Traverser::new(
        TraversalValue::List(vec![
            TraversalValue::Vertex(vertex),
            TraversalValue::Edge(edge),
        ]),
        Destination::step("next"),
        SideEffects::shared(),
    );
    t.set_sack(TraversalValue::Text("scratch".into()));

    let detached = t.detach();
    assert!(!detached.value().has_live_refs());

    let raw = serde_json::to_string(&detached).unwrap();
    let back: DetachedTraverser = serde_json::from_str(&raw).unwrap();
    assert_eq!(back, detached);
}

#[test]
fn detached_vertex_snapshot_carries_properties() {
    let host = populated_host();
    let vertex = host.vertex(&EntityId::Int(1)).unwrap();
    let t = Traverser::new(
        TraversalValue::Vertex(vertex),
        Destination::Halt,
        SideEffects::shared(),
    );

    match t.detach().value() {
        TraversalValue::DetachedVertex(v) => {
            assert_eq!(v.id, EntityId::Int(1));
            assert_eq!(v.label, "person");
            assert_eq!(v.properties.get("name"), Some(&json!("marko")));
        }
        other => panic!("expected detached vertex, got {other:?}"),
    }
}

#[test]
fn attach_to_graph_is_a_structural_error() {
    let host = populated_host();
    let vertex = host.vertex(&EntityId::Int(1)).unwrap();
    let t = Traverser::new(
        TraversalValue::Vertex(vertex),
        Destination::step("out"),
        SideEffects::shared(),
    );

    let err = t.detach().attach(&AttachTarget::Graph).unwrap_err();
    assert!(matches!(err, AttachError::GraphAttach));
}

#[test]
fn attach_fails_when_the_host_cannot_resolve_the_entity() {
    let host = populated_host();
    let vertex = host.vertex(&EntityId::Int(2)).unwrap();
    let t = Traverser::new(
        TraversalValue::Vertex(vertex),
        Destination::step("out"),
        SideEffects::shared(),
    );
    let detached = t.detach();

    // The receiving host knows nothing about vertex 2.
    let mut empty = TestHost::new(9);
    empty.add_vertex(TestVertex::new(5, "person"));

    let err = detached.attach(&AttachTarget::Entity(&empty)).unwrap_err();
    match err {
        AttachError::UnresolvedEntity { id, host } => {
            assert_eq!(id, EntityId::Int(2));
            assert_eq!(host, EntityId::Int(9));
        }
        other => panic!("expected unresolved entity, got {other:?}"),
    }
}

#[test]
fn attach_installs_a_fresh_side_effect_scope() {
    let host = populated_host();
    let vertex = host.vertex(&EntityId::Int(1)).unwrap();
    let shared = SideEffects::shared();
    shared.set("upstream", TraversalValue::Int(1));

    let t = Traverser::new(
        TraversalValue::Vertex(vertex),
        Destination::step("out"),
        shared,
    );
    let attached = t
        .detach()
        .attach(&AttachTarget::Entity(&host))
        .unwrap();

    // The receiving scope starts empty until the runtime rebinds it.
    assert_eq!(attached.side_effect("upstream"), None);
}
