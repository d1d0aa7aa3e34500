//! Blocking HTTP client for the drop service API. Timeouts are the
//! transport's defaults.

use super::{DropService, ServiceError, ServiceResult};
use crate::error::{DropsError, Result};
use crate::model::{
    Board, Credentials, DropContent, DropResult, DropUpdate, NewDrop, UpdatedDrop,
};
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::fs::File;
use tracing::debug;
use url::Url;

pub struct HttpDropService {
    client: Client,
    base_url: Url,
    credentials: Credentials,
}

impl HttpDropService {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DropsError::Config(format!("invalid api-url {}: {}", base_url, e)))?;
        let client = Client::builder()
            .user_agent(concat!("drops/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DropsError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> ServiceResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::message(format!("invalid api-url {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::Anonymous => request,
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Credentials::Token { jwt } => request.bearer_auth(jwt),
        }
    }

    fn execute(&self, request: RequestBuilder) -> ServiceResult<Response> {
        let response = self
            .authorize(request)
            .send()
            .map_err(|e| ServiceError::message(e.to_string()))?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "service responded");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(error_from_response(status, &body))
    }

    fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> ServiceResult<T> {
        self.execute(request)?
            .json::<T>()
            .map_err(|e| ServiceError::message(format!("unexpected response: {}", e)))
    }

    fn create_request(&self, payload: &NewDrop) -> ServiceResult<RequestBuilder> {
        let url = self.endpoint(&["drops"])?;
        let request = self.client.post(url);

        if let DropContent::File { path, content_type } = &payload.content {
            let file = File::open(path).map_err(|e| {
                ServiceError::message(format!("cannot read {}: {}", path.display(), e))
            })?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string());
            let part = multipart::Part::reader(file)
                .file_name(file_name)
                .mime_str(content_type)
                .map_err(|e| ServiceError::message(e.to_string()))?;
            let mut form = multipart::Form::new()
                .text("type", "FILE")
                .text("variant", content_type.clone());
            if let Some(title) = &payload.title {
                form = form.text("title", title.clone());
            }
            if let Some(board_id) = &payload.board_id {
                form = form.text("boardId", board_id.clone());
            }
            return Ok(request.multipart(form.part("file", part)));
        }

        Ok(request.json(&create_body(payload)))
    }
}

/// JSON body for link and note drops.
fn create_body(payload: &NewDrop) -> Value {
    let mut body = Map::new();
    body.insert("type".into(), json!(payload.content.drop_type()));
    match &payload.content {
        DropContent::Link { url } => {
            body.insert("content".into(), json!(url));
        }
        DropContent::Note {
            text,
            variant,
            language,
        } => {
            body.insert("content".into(), json!(text));
            body.insert("variant".into(), json!(variant));
            if let Some(language) = language {
                body.insert("lang".into(), json!(language));
            }
        }
        DropContent::File { content_type, .. } => {
            body.insert("variant".into(), json!(content_type));
        }
    }
    if let Some(title) = &payload.title {
        body.insert("title".into(), json!(title));
    }
    if let Some(board_id) = &payload.board_id {
        body.insert("boardId".into(), json!(board_id));
    }
    Value::Object(body)
}

/// Builds a [`ServiceError`] out of a failed response, keeping whatever
/// structure the body has.
pub fn error_from_response(status: StatusCode, body: &str) -> ServiceError {
    let mut error = ServiceError {
        status: Some(status.as_u16()),
        status_text: status.canonical_reason().map(str::to_string),
        ..Default::default()
    };

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => {
            error.message = ["message", "error"]
                .iter()
                .find_map(|key| fields.get(*key).and_then(Value::as_str))
                .map(str::to_string);
            error.details = ["errors", "validation"]
                .iter()
                .find_map(|key| fields.get(*key))
                .filter(|details| !details.is_null())
                .cloned();
        }
        Ok(Value::Array(entries)) => error.details = Some(Value::Array(entries)),
        _ => {
            if !body.trim().is_empty() {
                error.body = Some(body.to_string());
            }
        }
    }
    error
}

/// Reads an update answer. The status already confirmed success, so a body
/// that is empty, partial or not JSON only means nothing was echoed.
fn updated_from_body(body: &str) -> UpdatedDrop {
    if body.trim().is_empty() {
        return UpdatedDrop::default();
    }
    serde_json::from_str(body).unwrap_or_else(|e| {
        debug!(error = %e, "update response not understood, ignoring it");
        UpdatedDrop::default()
    })
}

/// Listings come back either bare or wrapped as `{"<key>": [...]}`.
fn listing<T: DeserializeOwned>(value: Value, key: &str) -> ServiceResult<Vec<T>> {
    let items = match value {
        Value::Object(mut fields) => fields.remove(key).unwrap_or(Value::Array(Vec::new())),
        other => other,
    };
    serde_json::from_value(items)
        .map_err(|e| ServiceError::message(format!("unexpected response: {}", e)))
}

impl DropService for HttpDropService {
    fn create_drop(&mut self, payload: &NewDrop) -> ServiceResult<DropResult> {
        debug!(drop_type = %payload.content.drop_type(), "POST /drops");
        let request = self.create_request(payload)?;
        self.fetch(request)
    }

    fn update_drop(&mut self, code: &str, update: &DropUpdate) -> ServiceResult<UpdatedDrop> {
        debug!(code, "PUT /drops/{{code}}");
        let url = self.endpoint(&["drops", code])?;
        let response = self.execute(self.client.put(url).json(update))?;
        let body = response.text().unwrap_or_default();
        Ok(updated_from_body(&body))
    }

    fn delete_drop(&mut self, code: &str) -> ServiceResult<()> {
        debug!(code, "DELETE /drops/{{code}}");
        let url = self.endpoint(&["drops", code])?;
        self.execute(self.client.delete(url)).map(|_| ())
    }

    fn list_drops(&self) -> ServiceResult<Vec<DropResult>> {
        let url = self.endpoint(&["drops"])?;
        let value: Value = self.fetch(self.client.get(url))?;
        listing(value, "drops")
    }

    fn list_boards(&self) -> ServiceResult<Vec<Board>> {
        let url = self.endpoint(&["boards"])?;
        let value: Value = self.fetch(self.client.get(url))?;
        listing(value, "boards")
    }

    fn get_board(&self, id: &str) -> ServiceResult<Board> {
        let url = self.endpoint(&["boards", id])?;
        self.fetch(self.client.get(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NoteVariant, Privacy};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::path::PathBuf;
    use std::thread;

    /// Answers a single request with `response` and returns the base URL.
    fn serve_once(response: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).unwrap();
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request_complete(&request) {
                    break;
                }
            }
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (base, handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        request.len() >= header_end + 4 + length
    }

    fn private_update() -> DropUpdate {
        DropUpdate {
            privacy: Some(Privacy::Private),
            ..Default::default()
        }
    }

    #[test]
    fn test_update_accepts_no_content() {
        let (base, server) = serve_once("HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n");
        let mut svc = service(&base);

        let updated = svc.update_drop("abc", &private_update()).unwrap();

        assert_eq!(updated, UpdatedDrop::default());
        let request = server.join().unwrap();
        assert!(request.starts_with("PUT /drops/abc "));
        assert!(request.contains(r#"{"privacy":"PRIVATE"}"#));
    }

    #[test]
    fn test_update_accepts_partial_body() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 21\r\nConnection: close\r\n\r\n{\"privacy\":\"PRIVATE\"}",
        );
        let mut svc = service(&base);

        let updated = svc.update_drop("abc", &private_update()).unwrap();

        assert_eq!(updated.privacy, Some(Privacy::Private));
        assert_eq!(updated.title, None);
        server.join().unwrap();
    }

    #[test]
    fn test_update_failure_still_reports_status() {
        let (base, server) = serve_once(
            "HTTP/1.1 403 Forbidden\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        let mut svc = service(&base);

        let err = svc.update_drop("abc", &private_update()).unwrap_err();

        assert_eq!(err.status, Some(403));
        server.join().unwrap();
    }

    #[test]
    fn test_updated_from_body() {
        assert_eq!(updated_from_body(""), UpdatedDrop::default());
        assert_eq!(updated_from_body("OK"), UpdatedDrop::default());
        assert_eq!(
            updated_from_body(r#"{"code": "abc", "title": "Groceries", "passwordProtected": true}"#),
            UpdatedDrop {
                title: Some("Groceries".to_string()),
                privacy: None,
                password_protected: Some(true),
            }
        );
    }

    fn service(base: &str) -> HttpDropService {
        HttpDropService::new(base, Credentials::Anonymous).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let svc = service("https://api.example.com/v2/");
        assert_eq!(
            svc.endpoint(&["drops", "aB3"]).unwrap().as_str(),
            "https://api.example.com/v2/drops/aB3"
        );
        let svc = service("https://api.example.com");
        assert_eq!(
            svc.endpoint(&["boards"]).unwrap().as_str(),
            "https://api.example.com/boards"
        );
    }

    #[test]
    fn test_endpoint_escapes_codes() {
        let svc = service("https://api.example.com");
        assert_eq!(
            svc.endpoint(&["drops", "a/b c"]).unwrap().as_str(),
            "https://api.example.com/drops/a%2Fb%20c"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpDropService::new("not a url", Credentials::Anonymous),
            Err(DropsError::Config(_))
        ));
    }

    #[test]
    fn test_note_body() {
        let payload = NewDrop {
            content: DropContent::Note {
                text: "print(1)".to_string(),
                variant: NoteVariant::Code,
                language: Some("python".to_string()),
            },
            title: Some("snippet".to_string()),
            board_id: None,
        };
        assert_eq!(
            create_body(&payload),
            json!({
                "type": "NOTE",
                "content": "print(1)",
                "variant": "code",
                "lang": "python",
                "title": "snippet"
            })
        );
    }

    #[test]
    fn test_link_body_never_carries_privacy() {
        let payload = NewDrop {
            content: DropContent::Link {
                url: "https://example.com/".to_string(),
            },
            title: None,
            board_id: Some("b1".to_string()),
        };
        let body = create_body(&payload);
        assert_eq!(
            body,
            json!({"type": "LINK", "content": "https://example.com/", "boardId": "b1"})
        );
        assert!(body.get("privacy").is_none());
    }

    #[test]
    fn test_update_body() {
        let update = DropUpdate {
            privacy: Some(Privacy::Private),
            password: Some("pw".to_string()),
            title: None,
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"privacy": "PRIVATE", "password": "pw"})
        );
    }

    #[test]
    fn test_missing_upload_file_is_service_error() {
        let svc = service("https://api.example.com");
        let payload = NewDrop {
            content: DropContent::File {
                path: PathBuf::from("/definitely/not/here.png"),
                content_type: "image/png".to_string(),
            },
            title: None,
            board_id: None,
        };
        let err = svc.create_request(&payload).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.png"));
    }

    #[test]
    fn test_error_with_validation_list() {
        let body = r#"{"message": "Validation failed", "errors": [{"field": "title", "messages": ["too long"]}]}"#;
        let error = error_from_response(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(error.status, Some(422));
        assert_eq!(error.status_text.as_deref(), Some("Unprocessable Entity"));
        assert_eq!(error.message.as_deref(), Some("Validation failed"));
        assert_eq!(
            error.details,
            Some(json!([{"field": "title", "messages": ["too long"]}]))
        );
    }

    #[test]
    fn test_error_with_validation_map_and_error_key() {
        let body = r#"{"error": "Bad Request", "validation": {"password": "too short"}}"#;
        let error = error_from_response(StatusCode::BAD_REQUEST, body);
        assert_eq!(error.message.as_deref(), Some("Bad Request"));
        assert_eq!(error.details, Some(json!({"password": "too short"})));
    }

    #[test]
    fn test_error_with_plain_body() {
        let error = error_from_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(error.body.as_deref(), Some("upstream down"));
        assert_eq!(error.message, None);

        let empty = error_from_response(StatusCode::UNAUTHORIZED, "");
        assert_eq!(empty.body, None);
        assert_eq!(empty.status_text.as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn test_listing_bare_or_wrapped() {
        let bare: Vec<Board> = listing(json!([{"id": "b1", "name": "Work"}]), "boards").unwrap();
        assert_eq!(bare.len(), 1);

        let wrapped: Vec<Board> = listing(
            json!({"boards": [{"id": "b1", "name": "Work"}, {"id": "b2", "name": "Home"}]}),
            "boards",
        )
        .unwrap();
        assert_eq!(wrapped.len(), 2);

        let missing: Vec<Board> = listing(json!({"count": 0}), "boards").unwrap();
        assert!(missing.is_empty());
    }
}
