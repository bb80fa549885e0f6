// src/backend/http.rs
// Canister HTTP interface: `/claim/{code}` pages and `/codes/{code}` JSON status.

use crate::{
    error::RedeemError,
    models::{ClaimOutcome, CodeRecord, TimestampNs},
    services::claim_service::{self, CodeRegistry},
    utils::{
        logging::log_error,
        runtime::Runtime,
        time::{format_claim_time, format_response_time},
    },
};
use candid::CandidType;
use serde::{Deserialize, Serialize};

pub type HeaderField = (String, String);

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<HeaderField>,
    #[serde(with = "serde_bytes")]
    pub body: Vec<u8>,
    pub certificate_version: Option<u16>,
}

#[derive(CandidType, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: Vec<HeaderField>,
    #[serde(with = "serde_bytes")]
    pub body: Vec<u8>,
    pub upgrade: Option<bool>,
}

const STORAGE_FAILURE_MESSAGE: &str = "We could not process this claim right now. Please try again.";

#[derive(Debug, PartialEq, Eq)]
pub enum Route {
    Claim(String),
    CodeStatus(String),
    Unknown,
}

/// JSON body for `/codes/{code}`.
#[derive(Serialize)]
struct CodeStatusView<'a> {
    id: &'a str,
    claimed: bool,
    claimed_by: Option<&'a str>,
    claimed_at: Option<String>,
}

impl<'a> From<&'a CodeRecord> for CodeStatusView<'a> {
    fn from(record: &'a CodeRecord) -> Self {
        Self {
            id: &record.id,
            claimed: record.is_claimed(),
            claimed_by: record.claimed_by(),
            claimed_at: record.claimed_at().map(format_claim_time),
        }
    }
}

fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        (key == name).then_some(value)
    })
}

pub fn route(url: &str) -> Route {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let path = path.trim_end_matches('/');
    if path == "/claim" {
        return Route::Claim(query_param(query, "code").unwrap_or_default().to_string());
    }
    if let Some(code) = path.strip_prefix("/claim/") {
        return Route::Claim(code.to_string());
    }
    if let Some(code) = path.strip_prefix("/codes/") {
        return Route::CodeStatus(code.to_string());
    }
    Route::Unknown
}

fn response(status_code: u16, content_type: &str, body: impl Into<Vec<u8>>) -> HttpResponse {
    HttpResponse {
        status_code,
        headers: vec![
            ("Content-Type".to_string(), content_type.to_string()),
            ("Cache-Control".to_string(), "no-store".to_string()),
        ],
        body: body.into(),
        upgrade: None,
    }
}

fn plain(status_code: u16, text: &str) -> HttpResponse {
    response(status_code, "text/plain; charset=utf-8", text)
}

fn is_get(req: &HttpRequest) -> bool {
    req.method.eq_ignore_ascii_case("GET")
}

/// Answers read-only routes; claims are handed to the update path.
pub fn handle_query<R: CodeRegistry>(req: &HttpRequest, registry: &R) -> HttpResponse {
    if !is_get(req) {
        return plain(405, "Method not allowed");
    }
    match route(&req.url) {
        Route::Claim(_) => HttpResponse {
            status_code: 200,
            headers: vec![],
            body: vec![],
            upgrade: Some(true),
        },
        Route::CodeStatus(code) => code_status(registry, &code),
        Route::Unknown => plain(404, "Not found"),
    }
}

fn code_status<R: CodeRegistry>(registry: &R, code: &str) -> HttpResponse {
    match registry.get(code) {
        Ok(Some(record)) => match serde_json::to_vec(&CodeStatusView::from(&record)) {
            Ok(body) => response(200, "application/json", body),
            Err(e) => {
                log_error!("Failed to encode status for {}: {}", code, e);
                plain(500, "Internal error")
            }
        },
        Ok(None) => plain(404, "Code not found"),
        Err(e) => {
            log_error!("Status lookup for {} failed: {}", code, e);
            plain(503, "Service unavailable")
        }
    }
}

/// Performs the claim for `/claim` routes and renders the result page.
pub async fn handle_update<R, T>(
    req: &HttpRequest,
    registry: &R,
    runtime: &T,
    reward: Option<&str>,
) -> HttpResponse
where
    R: CodeRegistry,
    T: Runtime,
{
    if !is_get(req) {
        return plain(405, "Method not allowed");
    }
    let Route::Claim(code) = route(&req.url) else {
        return handle_query(req, registry);
    };
    let result = claim_service::claim_code(registry, runtime, &code).await;
    let status_code = match &result {
        Err(e) if e.is_storage_failure() => 503,
        Err(_) => 500,
        Ok(_) => 200,
    };
    let page = render_claim_page(&code, &result, reward, runtime.now_ns());
    response(status_code, "text/html; charset=utf-8", page)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_claim_page(
    code: &str,
    result: &Result<ClaimOutcome, RedeemError>,
    reward: Option<&str>,
    responded_at: TimestampNs,
) -> String {
    let (ok, message) = match result {
        Ok(outcome) => (outcome.is_success(), outcome.message(reward)),
        Err(e) => {
            log_error!("Claim page for {} failed: {}", code, e);
            (false, STORAGE_FAILURE_MESSAGE.to_string())
        }
    };
    format!(
        r#"<!DOCTYPE html>
<html>
  <head><meta charset="utf-8"><title>Code Claim</title></head>
  <body style="font-family: sans-serif; text-align:center; padding:40px">
    <h1>{} Claim Result</h1>
    <p>Code: <b>{}</b></p>
    <p>{}</p>
    <p><i>{}</i></p>
  </body>
</html>
"#,
        if ok { "&#x2705;" } else { "&#x274C;" },
        escape_html(code),
        escape_html(&message),
        format_response_time(responded_at),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::claim_service::StableCodeRegistry;
    use crate::test_support::{issue_test_code, FakeRuntime};
    use futures::executor::block_on;

    fn get(url: &str) -> HttpRequest {
        HttpRequest {
            method: "GET".to_string(),
            url: url.to_string(),
            headers: vec![],
            body: vec![],
            certificate_version: None,
        }
    }

    fn body(resp: &HttpResponse) -> String {
        String::from_utf8(resp.body.clone()).unwrap()
    }

    #[test]
    fn routes_path_and_query_forms() {
        assert_eq!(route("/claim/ABC123"), Route::Claim("ABC123".to_string()));
        assert_eq!(route("/claim/ABC123/?utm=x"), Route::Claim("ABC123".to_string()));
        assert_eq!(route("/claim?x=1&code=ABC123"), Route::Claim("ABC123".to_string()));
        assert_eq!(route("/claim"), Route::Claim(String::new()));
        assert_eq!(route("/codes/ABC123"), Route::CodeStatus("ABC123".to_string()));
        assert_eq!(route("/"), Route::Unknown);
    }

    #[test]
    fn claim_query_asks_for_upgrade() {
        let resp = handle_query(&get("/claim/ABC123"), &StableCodeRegistry);
        assert_eq!(resp.upgrade, Some(true));
        assert_eq!(handle_query(&get("/nowhere"), &StableCodeRegistry).status_code, 404);

        let mut post = get("/claim/ABC123");
        post.method = "POST".to_string();
        assert_eq!(handle_query(&post, &StableCodeRegistry).status_code, 405);
    }

    #[test]
    fn claim_update_renders_success_then_rejection() {
        issue_test_code("ABC123");
        let runtime = FakeRuntime::new(1_704_164_645_000_000_000);

        let first = block_on(handle_update(
            &get("/claim/ABC123"),
            &StableCodeRegistry,
            &runtime,
            Some("WINNER50"),
        ));
        assert_eq!(first.status_code, 200);
        let page = body(&first);
        assert!(page.contains("&#x2705;"));
        assert!(page.contains("ABC123 claimed at 2024-01-02 03:04:05 by User_"));
        assert!(page.contains("Reward: WINNER50"));
        assert!(page.contains("January 02, 2024 03:04 AM"));

        let second = block_on(handle_update(
            &get("/claim/ABC123"),
            &StableCodeRegistry,
            &runtime,
            Some("WINNER50"),
        ));
        let page = body(&second);
        assert!(page.contains("&#x274C;"));
        assert!(page.contains("ABC123 already claimed by User_"));
        assert!(!page.contains("WINNER50"));
    }

    #[test]
    fn claim_page_escapes_untrusted_code() {
        let runtime = FakeRuntime::new(1);
        let resp = block_on(handle_update(
            &get("/claim/<script>"),
            &StableCodeRegistry,
            &runtime,
            None,
        ));
        let page = body(&resp);
        assert!(page.contains("Code &lt;script&gt; not found."));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn storage_failure_renders_generic_message() {
        let page = render_claim_page(
            "ABC123",
            &Err(RedeemError::StorageUnavailable("down".to_string())),
            Some("WINNER50"),
            0,
        );
        assert!(page.contains(STORAGE_FAILURE_MESSAGE));
        assert!(!page.contains("already claimed"));
        assert!(!page.contains("not found"));
    }

    #[test]
    fn status_route_reports_claim_state_as_json() {
        issue_test_code("S1");
        crate::storage::codes::try_claim("S1", "User_abcdef", 1_704_164_645_000_000_000);

        let resp = handle_query(&get("/codes/S1"), &StableCodeRegistry);
        assert_eq!(resp.status_code, 200);
        let json: serde_json::Value = serde_json::from_slice(&resp.body).unwrap();
        assert_eq!(json["id"], "S1");
        assert_eq!(json["claimed"], true);
        assert_eq!(json["claimed_by"], "User_abcdef");
        assert_eq!(json["claimed_at"], "2024-01-02 03:04:05");

        assert_eq!(handle_query(&get("/codes/NOPE"), &StableCodeRegistry).status_code, 404);
    }
}
