mod support;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;
use xapi::client::{Method, QueryFormat, VERSION_HEADER};
use xapi::{
    Activity, Agent, AttachmentPayloads, Attachment, ClientError, Iri, LanguageMap, Statement, StatementQuery,
    Verb,
};

use support::{client, param, FakeTransport};

const ASSIGNED_ID: &str = "7ccd3322-e1a5-411a-a67d-6a735c76f119";

fn statement() -> Statement {
    Statement::new(
        Agent::with_mbox("mailto:learner@example.com").unwrap(),
        Verb::from_id("http://adlnet.gov/expapi/verbs/attempted").unwrap(),
        Activity::from_id("http://example.com/activities/quiz").unwrap(),
    )
}

fn with_attachment(mut statement: Statement, payload: &[u8]) -> Statement {
    statement.attachments.push(Attachment::for_payload(
        Iri::new("http://adlnet.gov/expapi/attachments/signature").unwrap(),
        LanguageMap::single("en-US", "Signature").unwrap(),
        "application/octet-stream",
        payload,
    )
    .unwrap());
    statement
}

#[test]
fn test_save_statement_assigns_id() {
    let lrs = client(FakeTransport::new().respond(200, &format!(r#"["{ASSIGNED_ID}"]"#)));
    let mut stmt = statement();

    let id = lrs.save_statement(&mut stmt, None).unwrap();
    assert_eq!(id, Uuid::parse_str(ASSIGNED_ID).unwrap());
    assert_eq!(stmt.id, Some(id));

    let request = lrs.transport().last_request();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url.as_str(), "https://lrs.example.com/xapi/statements");
    assert_eq!(request.header_value("Content-Type"), Some("application/json"));
    assert_eq!(request.header_value(VERSION_HEADER), Some("1.0.3"));
    let body: Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body["verb"]["id"], json!("http://adlnet.gov/expapi/verbs/attempted"));
    assert!(body.get("id").is_none());
}

#[test]
fn test_save_statement_rejected_keeps_id_unset() {
    let lrs = client(FakeTransport::new().respond(422, "statement is invalid"));
    let mut stmt = statement();

    let err = lrs.save_statement(&mut stmt, None).unwrap_err();
    assert_eq!(
        err,
        ClientError::Remote {
            status: 422,
            body: "statement is invalid".to_string()
        }
    );
    assert_eq!(stmt.id, None);
}

#[test]
fn test_save_statement_with_id_uses_put() {
    let lrs = client(FakeTransport::new().respond(204, ""));
    let id = Uuid::parse_str("e05aa883-acaf-40ad-bf54-02c8ce485fb0").unwrap();
    let mut stmt = statement();
    stmt.id = Some(id);

    assert_eq!(lrs.save_statement(&mut stmt, None).unwrap(), id);
    let request = lrs.transport().last_request();
    assert_eq!(request.method, Method::Put);
    assert_eq!(param(&request, "statementId").as_deref(), Some("e05aa883-acaf-40ad-bf54-02c8ce485fb0"));
}

#[test]
fn test_transport_failure_is_reported() {
    let lrs = client(FakeTransport::new().fail("connection refused"));
    let mut stmt = statement();
    let err = lrs.save_statement(&mut stmt, None).unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(err.status(), None);
}

#[test]
fn test_save_statements_fills_ids_by_position() {
    let ids = [
        "7ccd3322-e1a5-411a-a67d-6a735c76f119",
        "e05aa883-acaf-40ad-bf54-02c8ce485fb0",
    ];
    let lrs = client(FakeTransport::new().respond(200, &serde_json::to_string(&ids).unwrap()));
    let mut batch = vec![statement(), statement()];

    let saved = lrs.save_statements(&mut batch, None).unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(batch[0].id, Some(Uuid::parse_str(ids[0]).unwrap()));
    assert_eq!(batch[1].id, Some(Uuid::parse_str(ids[1]).unwrap()));

    let body: Value = serde_json::from_slice(&lrs.transport().last_request().body).unwrap();
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[test]
fn test_save_statements_count_mismatch() {
    let lrs = client(FakeTransport::new().respond(200, &format!(r#"["{ASSIGNED_ID}"]"#)));
    let mut batch = vec![statement(), statement()];
    assert_eq!(
        lrs.save_statements(&mut batch, None).unwrap_err(),
        ClientError::IdCountMismatch { expected: 2, actual: 1 }
    );
    assert_eq!(batch[0].id, None);
}

#[test]
fn test_save_empty_batch_sends_nothing() {
    let lrs = client(FakeTransport::new());
    assert!(lrs.save_statements(&mut [], None).unwrap().is_empty());
    assert_eq!(lrs.transport().request_count(), 0);
}

#[test]
fn test_missing_attachment_data_fails_before_sending() {
    let lrs = client(FakeTransport::new().respond(200, &format!(r#"["{ASSIGNED_ID}"]"#)));
    let mut batch = vec![with_attachment(statement(), b"signature bytes")];
    let mut payloads = AttachmentPayloads::new();
    payloads.insert("wrong_hash", b"signature bytes".to_vec());

    let err = lrs.save_statements(&mut batch, Some(&payloads)).unwrap_err();
    assert_eq!(
        err,
        ClientError::MissingAttachmentData {
            sha2: batch[0].attachments[0].sha2.clone()
        }
    );
    assert_eq!(lrs.transport().request_count(), 0);
}

#[test]
fn test_attachments_are_sent_as_multipart() {
    let lrs = client(FakeTransport::new().respond(200, &format!(r#"["{ASSIGNED_ID}"]"#)));
    let mut stmt = with_attachment(statement(), b"signature bytes");
    let mut payloads = AttachmentPayloads::new();
    let sha2 = payloads.add(b"signature bytes".to_vec());

    lrs.save_statement(&mut stmt, Some(&payloads)).unwrap();

    let request = lrs.transport().last_request();
    let content_type = request.header_value("Content-Type").unwrap().to_string();
    assert!(content_type.starts_with("multipart/mixed; boundary="));
    let body = String::from_utf8(request.body).unwrap();
    assert!(body.contains("Content-Type: application/json\r\n"));
    assert!(body.contains(&format!("X-Experience-API-Hash: {sha2}\r\n")));
    assert!(body.contains("Content-Transfer-Encoding: binary\r\n"));
    assert!(body.contains("signature bytes"));
}

#[test]
fn test_uppercase_attachment_hash_finds_payload() {
    let lrs = client(FakeTransport::new().respond(200, &format!(r#"["{ASSIGNED_ID}"]"#)));
    let mut payloads = AttachmentPayloads::new();
    let sha2 = payloads.add(b"signed".to_vec());
    let mut stmt = xapi::codec::decode_statement(&json!({
        "actor": {"mbox": "mailto:learner@example.com"},
        "verb": {"id": "http://adlnet.gov/expapi/verbs/attempted"},
        "object": {"id": "http://example.com/activities/quiz"},
        "attachments": [{
            "usageType": "http://adlnet.gov/expapi/attachments/signature",
            "display": {"en-US": "Signature"},
            "contentType": "text/plain",
            "length": 6,
            "sha2": sha2.to_ascii_uppercase()
        }]
    }))
    .unwrap();

    lrs.save_statement(&mut stmt, Some(&payloads)).unwrap();

    let body = String::from_utf8(lrs.transport().last_request().body).unwrap();
    assert_eq!(body.matches(&format!("X-Experience-API-Hash: {sha2}\r\n")).count(), 1);
    assert!(body.contains("\r\n\r\nsigned\r\n"));
}

#[test]
fn test_empty_payload_map_sends_plain_json() {
    let lrs = client(FakeTransport::new().respond(200, &format!(r#"["{ASSIGNED_ID}"]"#)));
    let mut stmt = with_attachment(statement(), b"hosted elsewhere");
    lrs.save_statement(&mut stmt, Some(&AttachmentPayloads::new())).unwrap();
    assert_eq!(
        lrs.transport().last_request().header_value("Content-Type"),
        Some("application/json")
    );
}

#[test]
fn test_retrieve_statement() {
    let body = json!({
        "id": ASSIGNED_ID,
        "actor": {"objectType": "Agent", "mbox": "mailto:learner@example.com"},
        "verb": {"id": "http://adlnet.gov/expapi/verbs/attempted"},
        "object": {"objectType": "Activity", "id": "http://example.com/activities/quiz"},
        "stored": "2021-06-18T22:21:11.000+00:00"
    });
    let lrs = client(
        FakeTransport::new()
            .respond(200, &body.to_string())
            .respond(404, "")
            .respond(500, "down"),
    );
    let id = Uuid::parse_str(ASSIGNED_ID).unwrap();

    let found = lrs.retrieve_statement(id).unwrap().unwrap();
    assert_eq!(found.id, Some(id));
    assert!(found.stored().is_some());
    assert_eq!(param(&lrs.transport().last_request(), "statementId").as_deref(), Some(ASSIGNED_ID));

    assert_eq!(lrs.retrieve_voided_statement(id).unwrap(), None);
    assert_eq!(
        param(&lrs.transport().last_request(), "voidedStatementId").as_deref(),
        Some(ASSIGNED_ID)
    );

    assert!(matches!(
        lrs.retrieve_statement(id),
        Err(ClientError::Remote { status: 500, .. })
    ));
}

#[test]
fn test_query_statements_params() {
    let lrs = client(FakeTransport::new().respond(200, r#"{"statements": [], "more": ""}"#));
    let query = StatementQuery::new()
        .agent(Agent::with_mbox("mailto:learner@example.com").unwrap())
        .activity(Iri::new("http://example.com/activities/quiz").unwrap())
        .related_activities(true)
        .limit(10)
        .format(QueryFormat::Canonical);

    let result = lrs.query_statements(&query).unwrap();
    assert!(result.statements.is_empty());
    assert!(!result.has_more());

    let request = lrs.transport().last_request();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url.path(), "/xapi/statements");
    let agent: Value = serde_json::from_str(&param(&request, "agent").unwrap()).unwrap();
    assert_eq!(agent, json!({"objectType": "Agent", "mbox": "mailto:learner@example.com"}));
    assert_eq!(param(&request, "activity").as_deref(), Some("http://example.com/activities/quiz"));
    assert_eq!(param(&request, "related_activities").as_deref(), Some("true"));
    assert_eq!(param(&request, "limit").as_deref(), Some("10"));
    assert_eq!(param(&request, "format").as_deref(), Some("canonical"));
}

#[test]
fn test_more_statements_resolves_against_root() {
    let page = r#"{"statements": [], "more": "/xapi/statements?more=page3"}"#;
    let lrs = client(FakeTransport::new().respond(200, page).respond(200, page));

    let result = lrs.more_statements("/xapi/statements?more=page2").unwrap();
    assert_eq!(result.more.as_deref(), Some("/xapi/statements?more=page3"));
    assert_eq!(
        lrs.transport().last_request().url.as_str(),
        "https://lrs.example.com/xapi/statements?more=page2"
    );

    lrs.more_statements("https://mirror.example.com/statements?more=x").unwrap();
    assert_eq!(
        lrs.transport().last_request().url.as_str(),
        "https://mirror.example.com/statements?more=x"
    );
}

#[test]
fn test_about() {
    let lrs = client(FakeTransport::new().respond(200, r#"{"version": ["1.0.3"], "extensions": {}}"#));
    let about = lrs.about().unwrap();
    assert_eq!(about.version, vec!["1.0.3".to_string()]);
    let request = lrs.transport().last_request();
    assert_eq!(request.url.as_str(), "https://lrs.example.com/xapi/about");
    assert_eq!(request.header_value("Authorization"), Some("Basic dXNlcjpwYXNz"));
}
