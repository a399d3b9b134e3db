use pathloom::types::{Destination, ExecutionEngine};

#[test]
fn destination_predicates() {
    assert!(Destination::Halt.is_halt());
    assert_eq!(Destination::Halt.step_label(), None);

    let step = Destination::step("count");
    assert!(!step.is_halt());
    assert_eq!(step.step_label(), Some("count"));
}

#[test]
fn destination_encode_decode() {
    let cases = vec![
        (Destination::Halt, "Halt"),
        (Destination::step("filter"), "Step:filter"),
    ];
    for (dest, expected) in cases {
        let encoded = dest.encode();
        assert_eq!(encoded, expected);
        assert_eq!(Destination::decode(&encoded), dest);
    }

    // Bare labels from older writers keep routing.
    assert_eq!(Destination::decode("filter"), Destination::step("filter"));
}

#[test]
fn destination_display() {
    assert_eq!(Destination::Halt.to_string(), "<halt>");
    assert_eq!(Destination::step("out").to_string(), "out");
}

#[test]
fn engine_parse_and_display() {
    assert_eq!(
        "local".parse::<ExecutionEngine>().unwrap(),
        ExecutionEngine::Local
    );
    assert_eq!(
        "DISTRIBUTED".parse::<ExecutionEngine>().unwrap(),
        ExecutionEngine::Distributed
    );
    assert_eq!(ExecutionEngine::Local.to_string(), "local");
    assert_eq!(ExecutionEngine::Distributed.to_string(), "distributed");
}

#[test]
fn engine_rejects_names_outside_the_closed_enumeration() {
    let err = "mapreduce".parse::<ExecutionEngine>().unwrap_err();
    assert_eq!(err.name, "mapreduce");
}

#[test]
fn serde_support() {
    for dest in [Destination::Halt, Destination::step("a")] {
        let raw = serde_json::to_string(&dest).unwrap();
        let back: Destination = serde_json::from_str(&raw).unwrap();
        assert_eq!(dest, back);
    }
    for engine in [ExecutionEngine::Local, ExecutionEngine::Distributed] {
        let raw = serde_json::to_string(&engine).unwrap();
        let back: ExecutionEngine = serde_json::from_str(&raw).unwrap();
        assert_eq!(engine, back);
    }
}
