//! Integration tests for bucket properties and their encodings

use bucketprops::codec::{from_compact_record, parse_from_response, to_compact_record, to_json, RestResponse};
use bucketprops::{
    BucketProperties, CommitHook, Error, NativeHook, QuorumPolicy, QuorumValue, ScriptHook,
};

fn round_trip(props: &BucketProperties) -> BucketProperties {
    let json = to_json(props).unwrap();
    parse_from_response(&RestResponse::json(json)).unwrap()
}

#[test]
fn test_rest_round_trip_full() {
    let mut props = BucketProperties::new();
    props
        .set_replication_factor(5)
        .set_allow_siblings(true)
        .set_last_write_wins(false)
        .set_backend("eleveldb")
        .add_pre_commit_hook(ScriptHook::new("validate_json"))
        .add_pre_commit_hook(NativeHook::new("riak_kv_wm", "precommit"))
        .add_pre_commit_hook(ScriptHook::new("validate_json"))
        .add_post_commit_hook(NativeHook::new("audit", "log"));
    props
        .set_read_quorum(2u32)
        .unwrap()
        .set_read_write_quorum("all")
        .unwrap()
        .set_durable_write_quorum(QuorumPolicy::One)
        .unwrap()
        .set_write_quorum("quorum")
        .unwrap();

    assert_eq!(round_trip(&props), props);
}

#[test]
fn test_rest_round_trip_partial() {
    let mut props = BucketProperties::new();
    props.set_backend("memory");
    props.set_durable_write_quorum(3u32).unwrap();

    let parsed = round_trip(&props);
    assert_eq!(parsed, props);
    assert_eq!(parsed.replication_factor(), None);
    assert_eq!(parsed.write_quorum(), None);
}

#[test]
fn test_cleared_hooks_round_trip_as_unset() {
    // An empty list on the wire reads back as "never touched"
    let mut props = BucketProperties::new();
    props.clear_pre_commit_hooks().set_replication_factor(3);
    assert!(to_json(&props).unwrap().contains(r#""precommit":[]"#));

    let parsed = round_trip(&props);
    assert!(parsed.pre_commit_hooks().is_unset());
    assert_eq!(parsed.replication_factor(), Some(3));
}

#[test]
fn test_untouched_hooks_are_not_sent() {
    let mut props = BucketProperties::new();
    props.set_replication_factor(3);
    let json = to_json(&props).unwrap();
    assert!(!json.contains("precommit"));
    assert!(!json.contains("postcommit"));
}

#[test]
fn test_selector_each_disqualifying_field() {
    let base = || {
        let mut props = BucketProperties::new();
        props.set_replication_factor(3).set_allow_siblings(false);
        props
    };
    assert!(base().can_use_compact_protocol());

    let mut p = base();
    p.set_last_write_wins(true);
    assert!(!p.can_use_compact_protocol());

    let mut p = base();
    p.set_backend("bitcask");
    assert!(!p.can_use_compact_protocol());

    let mut p = base();
    p.set_read_quorum("one").unwrap();
    assert!(!p.can_use_compact_protocol());

    let mut p = base();
    p.set_read_write_quorum(1u32).unwrap();
    assert!(!p.can_use_compact_protocol());

    let mut p = base();
    p.set_durable_write_quorum("all").unwrap();
    assert!(!p.can_use_compact_protocol());

    let mut p = base();
    p.set_write_quorum(2u32).unwrap();
    assert!(!p.can_use_compact_protocol());
}

#[test]
fn test_quorum_construction() {
    assert!(matches!(
        QuorumValue::from_numeric(0),
        Err(Error::InvalidQuorum(_))
    ));
    assert!(QuorumValue::from_numeric(1).is_ok());
    assert!(QuorumValue::from_symbol("quorum").is_ok());
    assert!(matches!(
        QuorumValue::from_symbol("bogus"),
        Err(Error::InvalidQuorum(_))
    ));
}

#[test]
fn test_hook_decoding() {
    let body = r#"{"props":{"precommit":[
        {"name":"validate_json"},
        {"mod":"riak_kv_wm","fun":"precommit"}
    ]}}"#;
    let props = parse_from_response(&RestResponse::json(body)).unwrap();
    assert_eq!(
        props.pre_commit_hooks().as_slice().unwrap(),
        &[
            CommitHook::Script(ScriptHook::new("validate_json")),
            CommitHook::Native(NativeHook::new("riak_kv_wm", "precommit")),
        ]
    );

    let body = r#"{"props":{"precommit":[{"mod":"riak_kv_wm"}]}}"#;
    assert!(matches!(
        parse_from_response(&RestResponse::json(body)),
        Err(Error::MalformedHook(_))
    ));
}

#[test]
fn test_compact_end_to_end() {
    let mut props = BucketProperties::new();
    props.set_replication_factor(3).set_allow_siblings(true);
    assert!(props.can_use_compact_protocol());

    let record = to_compact_record(&props);
    assert_eq!(record.n_val, Some(3));
    assert_eq!(record.allow_mult, Some(true));
    assert_eq!(from_compact_record(&record), props);
}

#[test]
fn test_write_quorum_forces_rest() {
    let mut props = BucketProperties::new();
    props.set_replication_factor(3).set_allow_siblings(true);
    props
        .set_write_quorum(QuorumValue::Symbolic(QuorumPolicy::Quorum))
        .unwrap();

    assert!(!props.can_use_compact_protocol());
    assert!(to_json(&props).unwrap().contains(r#""w":"quorum""#));
}

#[test]
fn test_wrong_content_type() {
    let response = RestResponse::new("text/html", "<html></html>");
    assert!(matches!(
        parse_from_response(&response),
        Err(Error::UnexpectedContentType { .. })
    ));
}
