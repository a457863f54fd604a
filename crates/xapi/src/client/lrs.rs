//! Typed operations against a Learning Record Store.
//!
//! Each method performs exactly one HTTP exchange through the configured
//! [`Transport`]. The client keeps no mutable state, so a shared reference
//! can be used from several threads when the transport allows it.

use std::slice;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::client::config::{normalize_endpoint, Auth, LrsConfig};
use crate::client::multipart::{encode_multipart, AttachmentPayloads};
use crate::client::query::StatementQuery;
use crate::client::transport::{HttpRequest, HttpResponse, Method, Transport};
use crate::codec;
use crate::error::{ClientError, DecodeError};
use crate::model::{
    About, Activity, ActivityProfileDocument, ActivityProfileScope, AgentProfileDocument, AgentProfileScope,
    Document, DocumentScope, Iri, StateDocument, StateScope, Statement, StatementResult, Version,
};
use crate::util::format_query_time;

pub const VERSION_HEADER: &str = "X-Experience-API-Version";

const STATEMENTS: &str = "statements";

/// Client for one LRS endpoint.
#[derive(Debug, Clone)]
pub struct LrsClient<T> {
    endpoint: Url,
    version: Version,
    auth: Option<Auth>,
    transport: T,
}

#[cfg(feature = "reqwest")]
impl LrsClient<crate::client::transport::ReqwestTransport> {
    /// Builds a client with a [`ReqwestTransport`](crate::client::ReqwestTransport)
    /// using the configured timeout and user agent.
    pub fn from_config(config: LrsConfig) -> Result<Self, ClientError> {
        let transport = crate::client::transport::ReqwestTransport::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .build()?;
        Self::new(config, transport)
    }
}

impl<T: Transport> LrsClient<T> {
    pub fn new(config: LrsConfig, transport: T) -> Result<Self, ClientError> {
        Ok(Self {
            endpoint: normalize_endpoint(config.endpoint)?,
            version: config.version,
            auth: config.auth,
            transport,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // =========================================================================
    // ABOUT & STATEMENTS
    // =========================================================================

    pub fn about(&self) -> Result<About, ClientError> {
        let response = self.send(self.request(Method::Get, self.url("about", &[])?))?;
        let response = expect_success(response)?;
        Ok(codec::decode_about_bytes(&response.body)?)
    }

    /// Stores one statement and returns its id.
    ///
    /// A statement with an id is sent with PUT; otherwise it is POSTed and
    /// the id assigned by the LRS is written back into `statement`. On
    /// failure the statement is left untouched.
    pub fn save_statement(
        &self,
        statement: &mut Statement,
        attachments: Option<&AttachmentPayloads>,
    ) -> Result<Uuid, ClientError> {
        let json = codec::encode_statement_string(statement).into_bytes();
        let request = match statement.id {
            Some(id) => {
                let url = self.url(STATEMENTS, &[("statementId", id.hyphenated().to_string())])?;
                self.request(Method::Put, url)
            }
            None => self.request(Method::Post, self.url(STATEMENTS, &[])?),
        };
        let request = with_statement_body(request, json, slice::from_ref(statement), attachments)?;
        let response = expect_success(self.send(request)?)?;

        if let Some(id) = statement.id {
            return Ok(id);
        }
        let ids = codec::decode_statement_ids(&response.body)?;
        match ids.as_slice() {
            [id] => {
                statement.id = Some(*id);
                Ok(*id)
            }
            _ => Err(ClientError::IdCountMismatch {
                expected: 1,
                actual: ids.len(),
            }),
        }
    }

    /// Stores a batch of statements in one POST and fills in their ids by
    /// position. An empty batch sends nothing.
    pub fn save_statements(
        &self,
        statements: &mut [Statement],
        attachments: Option<&AttachmentPayloads>,
    ) -> Result<Vec<Uuid>, ClientError> {
        if statements.is_empty() {
            return Ok(Vec::new());
        }
        let json = codec::encode_statements(statements).to_string().into_bytes();
        let request = self.request(Method::Post, self.url(STATEMENTS, &[])?);
        let request = with_statement_body(request, json, statements, attachments)?;
        let response = expect_success(self.send(request)?)?;

        let ids = codec::decode_statement_ids(&response.body)?;
        if ids.len() != statements.len() {
            return Err(ClientError::IdCountMismatch {
                expected: statements.len(),
                actual: ids.len(),
            });
        }
        for (statement, id) in statements.iter_mut().zip(&ids) {
            statement.id = Some(*id);
        }
        Ok(ids)
    }

    pub fn retrieve_statement(&self, id: Uuid) -> Result<Option<Statement>, ClientError> {
        self.get_statement("statementId", id)
    }

    pub fn retrieve_voided_statement(&self, id: Uuid) -> Result<Option<Statement>, ClientError> {
        self.get_statement("voidedStatementId", id)
    }

    fn get_statement(&self, param: &'static str, id: Uuid) -> Result<Option<Statement>, ClientError> {
        let url = self.url(STATEMENTS, &[(param, id.hyphenated().to_string())])?;
        let Some(response) = found(self.send(self.request(Method::Get, url))?)? else {
            return Ok(None);
        };
        Ok(Some(codec::decode_statement_bytes(&response.body)?))
    }

    pub fn query_statements(&self, query: &StatementQuery) -> Result<StatementResult, ClientError> {
        let url = self.url(STATEMENTS, &query.to_params())?;
        self.get_statement_result(url)
    }

    /// Follows a `more` link from a previous [`StatementResult`].
    ///
    /// The link is resolved against the scheme and host of the endpoint, so
    /// both server-relative paths and absolute URLs work.
    pub fn more_statements(&self, more: &str) -> Result<StatementResult, ClientError> {
        let url = self
            .endpoint
            .join("/")
            .and_then(|root| root.join(more))
            .map_err(|err| ClientError::InvalidEndpoint {
                url: more.to_string(),
                message: err.to_string(),
            })?;
        self.get_statement_result(url)
    }

    fn get_statement_result(&self, url: Url) -> Result<StatementResult, ClientError> {
        let response = expect_success(self.send(self.request(Method::Get, url))?)?;
        Ok(codec::decode_statement_result_bytes(&response.body)?)
    }

    pub fn retrieve_activity(&self, id: &Iri) -> Result<Option<Activity>, ClientError> {
        let url = self.url("activities", &[("activityId", id.to_string())])?;
        let Some(response) = found(self.send(self.request(Method::Get, url))?)? else {
            return Ok(None);
        };
        let value: serde_json::Value = serde_json::from_slice(&response.body).map_err(DecodeError::from)?;
        Ok(Some(codec::decode_activity(&value)?))
    }

    // =========================================================================
    // DOCUMENTS
    // =========================================================================

    pub fn retrieve_state(&self, id: &str, scope: &StateScope) -> Result<Option<StateDocument>, ClientError> {
        self.retrieve_document(id, scope)
    }

    /// Writes a state document. Returns `false` if the LRS reported a
    /// conflict.
    pub fn save_state(&self, document: &StateDocument) -> Result<bool, ClientError> {
        self.save_document(document)
    }

    pub fn delete_state(&self, document: &StateDocument) -> Result<bool, ClientError> {
        self.delete_document(document)
    }

    /// Deletes every state document in `scope`.
    pub fn clear_state(&self, scope: &StateScope) -> Result<bool, ClientError> {
        let request = self.request(Method::Delete, self.url(StateScope::RESOURCE, &scope.query_params())?);
        write_outcome(self.send(request)?)
    }

    pub fn retrieve_state_ids(
        &self,
        scope: &StateScope,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<String>, ClientError> {
        self.retrieve_document_ids(scope, since)
    }

    pub fn retrieve_activity_profile(
        &self,
        id: &str,
        scope: &ActivityProfileScope,
    ) -> Result<Option<ActivityProfileDocument>, ClientError> {
        self.retrieve_document(id, scope)
    }

    pub fn save_activity_profile(&self, document: &ActivityProfileDocument) -> Result<bool, ClientError> {
        self.save_document(document)
    }

    pub fn delete_activity_profile(&self, document: &ActivityProfileDocument) -> Result<bool, ClientError> {
        self.delete_document(document)
    }

    pub fn retrieve_activity_profile_ids(
        &self,
        scope: &ActivityProfileScope,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<String>, ClientError> {
        self.retrieve_document_ids(scope, since)
    }

    pub fn retrieve_agent_profile(
        &self,
        id: &str,
        scope: &AgentProfileScope,
    ) -> Result<Option<AgentProfileDocument>, ClientError> {
        self.retrieve_document(id, scope)
    }

    pub fn save_agent_profile(&self, document: &AgentProfileDocument) -> Result<bool, ClientError> {
        self.save_document(document)
    }

    pub fn delete_agent_profile(&self, document: &AgentProfileDocument) -> Result<bool, ClientError> {
        self.delete_document(document)
    }

    pub fn retrieve_agent_profile_ids(
        &self,
        scope: &AgentProfileScope,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<String>, ClientError> {
        self.retrieve_document_ids(scope, since)
    }

    fn retrieve_document<S: DocumentScope + Clone>(
        &self,
        id: &str,
        scope: &S,
    ) -> Result<Option<Document<S>>, ClientError> {
        let url = self.document_url(id, scope)?;
        let Some(response) = found(self.send(self.request(Method::Get, url))?)? else {
            return Ok(None);
        };
        Ok(Some(Document::from_response(id, scope.clone(), &response)))
    }

    fn save_document<S: DocumentScope>(&self, document: &Document<S>) -> Result<bool, ClientError> {
        let url = self.document_url(&document.id, &document.scope)?;
        let mut request = self
            .request(Method::Put, url)
            .header("Content-Type", document.effective_content_type())
            .body(document.content.clone());
        if let Some(etag) = &document.etag {
            request = request.header("If-Match", etag.as_str());
        }
        write_outcome(self.send(request)?)
    }

    fn delete_document<S: DocumentScope>(&self, document: &Document<S>) -> Result<bool, ClientError> {
        let url = self.document_url(&document.id, &document.scope)?;
        let mut request = self.request(Method::Delete, url);
        if let Some(etag) = &document.etag {
            request = request.header("If-Match", etag.as_str());
        }
        write_outcome(self.send(request)?)
    }

    fn retrieve_document_ids<S: DocumentScope>(
        &self,
        scope: &S,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<String>, ClientError> {
        let mut params = scope.query_params();
        if let Some(since) = &since {
            params.push(("since", format_query_time(since)));
        }
        let url = self.url(S::RESOURCE, &params)?;
        let response = expect_success(self.send(self.request(Method::Get, url))?)?;
        let ids: Vec<String> = serde_json::from_slice(&response.body).map_err(DecodeError::from)?;
        Ok(ids)
    }

    fn document_url<S: DocumentScope>(&self, id: &str, scope: &S) -> Result<Url, ClientError> {
        let mut params = scope.query_params();
        params.push((S::ID_PARAM, id.to_string()));
        self.url(S::RESOURCE, &params)
    }

    // =========================================================================
    // HTTP
    // =========================================================================

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, ClientError> {
        let mut url = self.endpoint.join(path).map_err(|err| ClientError::InvalidEndpoint {
            url: format!("{}{path}", self.endpoint),
            message: err.to_string(),
        })?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> HttpRequest {
        let request = HttpRequest::new(method, url).header(VERSION_HEADER, self.version.as_str());
        match &self.auth {
            Some(auth) => request.header("Authorization", auth.header_value()),
            None => request,
        }
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, body_len = request.body.len(), "LRS request");
        let response = self.transport.send(request).map_err(|err| {
            debug!(%method, %url, error = %err, "LRS request failed");
            err
        })?;
        debug!(%method, %url, status = response.status, "LRS response");
        Ok(response)
    }
}

/// Attaches the statement JSON, as multipart when payloads are supplied.
fn with_statement_body(
    request: HttpRequest,
    json: Vec<u8>,
    statements: &[Statement],
    attachments: Option<&AttachmentPayloads>,
) -> Result<HttpRequest, ClientError> {
    match attachments {
        Some(payloads) if !payloads.is_empty() => {
            let multipart = encode_multipart(&json, statements, payloads)?;
            Ok(request
                .header("Content-Type", multipart.content_type())
                .body(multipart.body))
        }
        _ => Ok(request.header("Content-Type", "application/json").body(json)),
    }
}

fn remote(response: HttpResponse) -> ClientError {
    ClientError::Remote {
        status: response.status,
        body: response.text(),
    }
}

fn expect_success(response: HttpResponse) -> Result<HttpResponse, ClientError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(remote(response))
    }
}

/// 404 is "not found"; any other failure is an error.
fn found(response: HttpResponse) -> Result<Option<HttpResponse>, ClientError> {
    match response.status {
        404 => Ok(None),
        _ => expect_success(response).map(Some),
    }
}

fn write_outcome(response: HttpResponse) -> Result<bool, ClientError> {
    match response.status {
        200..=299 => Ok(true),
        409 => {
            warn!(body = %response.text(), "LRS reported a conflict; document not written");
            Ok(false)
        }
        412 => Err(ClientError::PreconditionFailed { body: response.text() }),
        _ => Err(remote(response)),
    }
}
