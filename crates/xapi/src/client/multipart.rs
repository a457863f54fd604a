//! `multipart/mixed` bodies for statements with attachment payloads.
//!
//! The first part is the statement JSON. Each following part carries the raw
//! bytes of one attachment, labelled with its SHA-256 in
//! `X-Experience-API-Hash`.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::warn;
use uuid::Uuid;

use crate::error::ClientError;
use crate::model::{parse_content_type, sha2_hex, Attachment, Statement, StatementObject};

/// Attachment payloads keyed by their `sha2` hash.
///
/// Hashes are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentPayloads {
    payloads: FxHashMap<String, Vec<u8>>,
}

impl AttachmentPayloads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a payload under its computed hash and returns the hash.
    pub fn add(&mut self, payload: impl Into<Vec<u8>>) -> String {
        let payload = payload.into();
        let sha2 = sha2_hex(&payload);
        self.payloads.insert(sha2.clone(), payload);
        sha2
    }

    /// Adds a payload under an explicit hash. The hash is not checked.
    pub fn insert(&mut self, sha2: impl Into<String>, payload: impl Into<Vec<u8>>) -> Option<Vec<u8>> {
        let mut sha2 = sha2.into();
        sha2.make_ascii_lowercase();
        self.payloads.insert(sha2, payload.into())
    }

    pub fn get(&self, sha2: &str) -> Option<&[u8]> {
        self.payloads.get(&sha2.to_ascii_lowercase()).map(Vec::as_slice)
    }

    pub fn contains(&self, sha2: &str) -> bool {
        self.get(sha2).is_some()
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

/// An encoded multipart body and its boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    pub boundary: String,
    pub body: Vec<u8>,
}

impl MultipartBody {
    /// Value for the request `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/mixed; boundary={}", self.boundary)
    }
}

/// Builds the multipart body for `statements`, serialized as `json`.
///
/// Fails with [`ClientError::MissingAttachmentData`] if any attachment hash
/// declared by the statements has no payload, and with
/// [`ClientError::Validation`] if a content type would break the part
/// headers. Each hash is sent once.
pub fn encode_multipart(
    json: &[u8],
    statements: &[Statement],
    payloads: &AttachmentPayloads,
) -> Result<MultipartBody, ClientError> {
    let mut seen = FxHashSet::default();
    let mut parts: Vec<(&str, &str, &[u8])> = Vec::new();
    for statement in statements {
        let nested: &[Attachment] = match &statement.object {
            StatementObject::SubStatement(sub) => &sub.attachments,
            _ => &[],
        };
        for attachment in statement.attachments.iter().chain(nested) {
            if !seen.insert(attachment.sha2.to_ascii_lowercase()) {
                continue;
            }
            parse_content_type(attachment.content_type.as_str())?;
            let payload = payloads.get(&attachment.sha2).ok_or_else(|| ClientError::MissingAttachmentData {
                sha2: attachment.sha2.clone(),
            })?;
            parts.push((attachment.sha2.as_str(), attachment.content_type.as_str(), payload));
        }
    }

    let unused = payloads.payloads.keys().filter(|k| !seen.contains(k.as_str())).count();
    if unused > 0 {
        warn!(unused, "attachment payloads not referenced by any statement were not sent");
    }

    let boundary = format!("xapi-{}", Uuid::new_v4().simple());
    let mut body = Vec::with_capacity(json.len() + parts.iter().map(|(_, _, p)| p.len() + 256).sum::<usize>());
    push_part_header(&mut body, &boundary, &[("Content-Type", "application/json")]);
    body.extend_from_slice(json);
    body.extend_from_slice(b"\r\n");
    for (sha2, content_type, payload) in parts {
        push_part_header(
            &mut body,
            &boundary,
            &[
                ("Content-Type", content_type),
                ("Content-Transfer-Encoding", "binary"),
                ("X-Experience-API-Hash", sha2),
            ],
        );
        body.extend_from_slice(payload);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    Ok(MultipartBody { boundary, body })
}

fn push_part_header(body: &mut Vec<u8>, boundary: &str, headers: &[(&str, &str)]) {
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    for (name, value) in headers {
        body.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
    }
    body.extend_from_slice(b"\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::model::{Activity, Agent, Iri, LanguageMap, Verb};

    fn statement_with(payload: &[u8]) -> Statement {
        let mut statement = Statement::new(
            Agent::with_mbox("mailto:learner@example.com").unwrap(),
            Verb::from_id("http://adlnet.gov/expapi/verbs/attempted").unwrap(),
            Activity::from_id("http://example.com/activities/quiz").unwrap(),
        );
        statement.attachments.push(Attachment::for_payload(
            Iri::new("http://adlnet.gov/expapi/attachments/signature").unwrap(),
            LanguageMap::single("en-US", "Signature").unwrap(),
            "text/plain",
            payload,
        )
        .unwrap());
        statement
    }

    #[test]
    fn test_missing_payload() {
        let statement = statement_with(b"signed");
        let mut payloads = AttachmentPayloads::new();
        payloads.insert("wrong_hash", b"signed".to_vec());
        let err = encode_multipart(b"{}", &[statement.clone()], &payloads).unwrap_err();
        assert_eq!(
            err,
            ClientError::MissingAttachmentData {
                sha2: statement.attachments[0].sha2.clone()
            }
        );
    }

    #[test]
    fn test_body_layout() {
        let statement = statement_with(b"signed");
        let mut payloads = AttachmentPayloads::new();
        let sha2 = payloads.add(b"signed".to_vec());

        let multipart = encode_multipart(br#"{"k":1}"#, &[statement], &payloads).unwrap();
        assert!(multipart.boundary.starts_with("xapi-"));
        assert_eq!(
            multipart.content_type(),
            format!("multipart/mixed; boundary={}", multipart.boundary)
        );

        let b = &multipart.boundary;
        let expected = format!(
            "--{b}\r\nContent-Type: application/json\r\n\r\n{{\"k\":1}}\r\n\
             --{b}\r\nContent-Type: text/plain\r\nContent-Transfer-Encoding: binary\r\n\
             X-Experience-API-Hash: {sha2}\r\n\r\nsigned\r\n--{b}--\r\n"
        );
        assert_eq!(String::from_utf8(multipart.body).unwrap(), expected);
    }

    #[test]
    fn test_shared_hash_sent_once() {
        let statements = [statement_with(b"same"), statement_with(b"same")];
        let mut payloads = AttachmentPayloads::new();
        payloads.add(b"same".to_vec());
        let multipart = encode_multipart(b"[]", &statements, &payloads).unwrap();
        let text = String::from_utf8(multipart.body).unwrap();
        assert_eq!(text.matches("X-Experience-API-Hash").count(), 1);
    }

    #[test]
    fn test_hash_matching_ignores_case() {
        let mut statement = statement_with(b"signed");
        statement.attachments[0].sha2.make_ascii_uppercase();
        let mut payloads = AttachmentPayloads::new();
        let sha2 = payloads.add(b"signed".to_vec());
        assert!(payloads.contains(&sha2.to_ascii_uppercase()));

        let multipart = encode_multipart(b"{}", &[statement], &payloads).unwrap();
        let text = String::from_utf8(multipart.body).unwrap();
        assert!(text.ends_with(&format!("\r\n\r\nsigned\r\n--{}--\r\n", multipart.boundary)));
    }

    #[test]
    fn test_content_type_cannot_inject_headers() {
        let mut statement = statement_with(b"signed");
        statement.attachments[0].content_type = "text/plain\r\nX-Experience-API-Hash: deadbeef".to_string();
        let mut payloads = AttachmentPayloads::new();
        payloads.add(b"signed".to_vec());

        let err = encode_multipart(b"{}", &[statement], &payloads).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::InvalidContentType { .. })
        ));
    }
}
