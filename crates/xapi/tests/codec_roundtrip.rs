use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use xapi::codec::{decode_actor, decode_statement, decode_statement_object, encode_statement};
use xapi::error::RecursionViolation;
use xapi::model::{parse_uuid, SubStatement, SubStatementObject};
use xapi::{
    Activity, Actor, Agent, DecodeError, Group, ObjectType, Statement, StatementObject, StatementRef, Verb,
};

fn canonical_statement() -> Value {
    json!({
        "id": "fd41c918-b88b-4b20-a0a5-a4c32391aaa0",
        "actor": {
            "objectType": "Agent",
            "name": "Project Tin Can API",
            "mbox": "mailto:user@example.com"
        },
        "verb": {
            "id": "http://example.com/xapi/verbs#sent-a-statement",
            "display": {"en-US": "sent"}
        },
        "object": {
            "objectType": "Activity",
            "id": "http://example.com/xapi/activity/simplestatement",
            "definition": {
                "name": {"en-US": "simple statement"},
                "description": {"en-US": "A simple Experience API statement."},
                "type": "http://adlnet.gov/expapi/activities/assessment"
            }
        },
        "result": {
            "score": {"scaled": 0.95, "raw": 95, "min": 0, "max": 100},
            "success": true,
            "completion": true,
            "duration": "PT1H30M12.5S",
            "extensions": {"http://example.com/ext/attempts": 2}
        },
        "context": {
            "registration": "ec531277-b57b-4c15-8d91-d292c5b2b8f7",
            "instructor": {
                "objectType": "Agent",
                "account": {"name": "instructor-7", "homePage": "http://lms.example.com"}
            },
            "team": {
                "objectType": "Group",
                "name": "Team A",
                "member": [
                    {"objectType": "Agent", "mbox": "mailto:a@example.com"},
                    {"objectType": "Agent", "mbox": "mailto:b@example.com"}
                ]
            },
            "contextActivities": {
                "parent": [{"objectType": "Activity", "id": "http://example.com/activities/course"}],
                "category": [{"objectType": "Activity", "id": "http://example.com/profiles/scorm"}]
            },
            "revision": "2",
            "platform": "Example LMS",
            "language": "en-US",
            "statement": {
                "objectType": "StatementRef",
                "id": "6690e6c9-3ef0-4ed3-8b37-7f3964730bee"
            }
        },
        "timestamp": "2013-05-18T05:32:34.804Z",
        "authority": {
            "objectType": "Agent",
            "account": {"name": "lrs-client", "homePage": "http://lrs.example.com"}
        },
        "version": "1.0.0",
        "attachments": [{
            "usageType": "http://adlnet.gov/expapi/attachments/signature",
            "display": {"en-US": "Signature"},
            "contentType": "application/octet-stream",
            "length": 4235,
            "sha2": "672fa5fa658017f1b72d65036f13379c6ab05d4ab3b6664908d8acf0b6a0c634"
        }]
    })
}

#[test]
fn test_canonical_statement_round_trip() {
    let json = canonical_statement();
    let statement = decode_statement(&json).unwrap();
    assert_eq!(encode_statement(&statement), json);
}

#[test]
fn test_sub_statement_round_trip() {
    let json = json!({
        "actor": {"objectType": "Agent", "mbox": "mailto:learner@example.com"},
        "verb": {"id": "http://example.com/verbs/planned"},
        "object": {
            "objectType": "SubStatement",
            "actor": {"objectType": "Group", "openid": "http://example.com/groups/7", "member": []},
            "verb": {"id": "http://adlnet.gov/expapi/verbs/experienced"},
            "object": {"objectType": "Agent", "mbox_sha1sum": "ebd31e95054c018b10727ccffd2ef2ec3a016ee9"},
            "timestamp": "2021-06-18T22:21:11+02:00"
        },
        "stored": "2021-06-18T22:21:11.123456Z"
    });
    let statement = decode_statement(&json).unwrap();
    assert!(matches!(statement.object, StatementObject::SubStatement(_)));
    assert!(statement.stored().is_some());
    assert_eq!(encode_statement(&statement), json);
}

#[test]
fn test_utc_timestamp_and_tagged_context_activities_round_trip() {
    let json = json!({
        "actor": {"objectType": "Agent", "mbox": "mailto:learner@example.com"},
        "verb": {"id": "http://adlnet.gov/expapi/verbs/attempted"},
        "object": {"objectType": "Activity", "id": "http://example.com/activities/quiz"},
        "context": {
            "contextActivities": {
                "parent": [{"objectType": "Activity", "id": "http://example.com/activities/course"}],
                "grouping": [{"objectType": "Activity", "id": "http://example.com/activities/program"}]
            }
        },
        "timestamp": "2013-05-18T05:32:34.804Z"
    });
    let statement = decode_statement(&json).unwrap();
    assert_eq!(encode_statement(&statement), json);
}

#[test]
fn test_serde_matches_codec() {
    let json = canonical_statement();
    let statement: Statement = serde_json::from_value(json.clone()).unwrap();
    assert_eq!(serde_json::to_value(&statement).unwrap(), json);
}

#[test]
fn test_agent_and_group_discrimination() {
    let agent = decode_actor(&json!({"objectType": "Agent", "mbox": "mailto:a@b.com"})).unwrap();
    assert_eq!(agent, Actor::Agent(Agent::with_mbox("mailto:a@b.com").unwrap()));

    let anonymous = decode_actor(&json!({
        "objectType": "Group",
        "member": [{"mbox": "mailto:a@b.com"}]
    }))
    .unwrap();
    assert!(matches!(anonymous, Actor::Group(Group::Anonymous(_))));

    for ifi in [
        json!({"mbox": "mailto:team@b.com"}),
        json!({"mbox_sha1sum": "ebd31e95054c018b10727ccffd2ef2ec3a016ee9"}),
        json!({"openid": "http://example.com/groups/7"}),
        json!({"account": {"name": "team", "homePage": "http://example.com"}}),
    ] {
        let mut value = json!({"objectType": "Group", "member": []});
        let fields = ifi.as_object().unwrap().clone();
        value.as_object_mut().unwrap().extend(fields);
        let group = decode_actor(&value).unwrap();
        assert!(matches!(group, Actor::Group(Group::Identified(_))), "{value}");
    }
}

#[test]
fn test_object_without_tag_is_activity() {
    let object = decode_statement_object(&json!({"id": "http://example.com/activities/quiz"})).unwrap();
    assert_eq!(object.object_type(), ObjectType::Activity);
}

#[test]
fn test_sub_statement_object_restrictions() {
    let actor = Agent::with_mbox("mailto:a@b.com").unwrap();
    let verb = Verb::from_id("http://example.com/verbs/did").unwrap();
    let reference = StatementRef::new(parse_uuid("e05aa883-acaf-40ad-bf54-02c8ce485fb0").unwrap());

    let err = SubStatement::new(actor.clone(), verb.clone(), reference).unwrap_err();
    assert_eq!(
        err,
        RecursionViolation {
            object_type: ObjectType::StatementRef,
            container: "SubStatement",
        }
    );

    let inner = SubStatement::new(actor.clone(), verb.clone(), actor.clone()).unwrap();
    let mut sub = SubStatement::new(
        actor,
        verb,
        Activity::from_id("http://example.com/activities/quiz").unwrap(),
    )
    .unwrap();
    assert!(sub.set_object(inner).is_err());
    assert!(sub.set_object(reference).is_err());
    assert!(matches!(sub.object(), SubStatementObject::Activity(_)));
}

#[test]
fn test_sub_statement_ref_rejected_when_decoding() {
    let err = decode_statement(&json!({
        "actor": {"mbox": "mailto:a@b.com"},
        "verb": {"id": "http://example.com/verbs/did"},
        "object": {
            "objectType": "SubStatement",
            "actor": {"mbox": "mailto:a@b.com"},
            "verb": {"id": "http://example.com/verbs/did"},
            "object": {"objectType": "StatementRef", "id": "e05aa883-acaf-40ad-bf54-02c8ce485fb0"}
        }
    }))
    .unwrap_err();
    assert!(matches!(err, DecodeError::Recursion(_)));
}

#[test]
fn test_uuid_fields() {
    assert!(parse_uuid("foo").is_err());
    assert!(parse_uuid("e05aa883-acaf-40ad-bf54-02c8ce485fb0").is_ok());

    let err = decode_statement(&json!({
        "id": "foo",
        "actor": {"mbox": "mailto:a@b.com"},
        "verb": {"id": "http://example.com/verbs/did"},
        "object": {"id": "http://example.com/activities/quiz"}
    }))
    .unwrap_err();
    assert!(matches!(err, DecodeError::Invalid { field: "id", .. }));
}
