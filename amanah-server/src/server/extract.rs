//! Body, path and query extractors whose rejections use the error envelope.
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
};

use super::response::ApiError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

fn rejected(status: StatusCode, detail: String) -> ApiError {
    if status.is_server_error() {
        ApiError::internal(detail)
    } else {
        ApiError::bad_request(detail)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        rejected(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        rejected(rejection.status(), rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        routing::{get, post},
        Router,
    };
    use rust_decimal::Decimal;
    use serde::Deserialize;
    use serde_json::Value;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use amanah_ledger::LedgerEntryId;

    use super::*;
    use crate::server::response::{ApiResponse, ApiResult};

    #[derive(Deserialize)]
    struct Amount {
        amount: Decimal,
    }

    #[derive(Deserialize)]
    struct Page {
        #[allow(dead_code)]
        first: Option<usize>,
    }

    async fn create(Json(body): Json<Amount>) -> ApiResult<Decimal> {
        Ok(ApiResponse(body.amount))
    }

    async fn find(Path(id): Path<LedgerEntryId>) -> ApiResult<LedgerEntryId> {
        Ok(ApiResponse(id))
    }

    async fn list(Query(_): Query<Page>) -> ApiResult<()> {
        Ok(ApiResponse(()))
    }

    fn router() -> Router {
        Router::new()
            .route("/entries", get(list).post(create))
            .route("/entries/:id", get(find))
    }

    /// Sends one raw HTTP/1.1 request and returns the status with the JSON body.
    async fn send(request: String) -> (u16, Value) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router()).await });
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();
        let (head, body) = raw.split_once("\r\n\r\n").unwrap();
        let status = head.split_whitespace().nth(1).unwrap().parse().unwrap();
        (status, serde_json::from_str(body).unwrap())
    }

    fn get_request(uri: &str) -> String {
        format!("GET {uri} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
    }

    fn post_json(uri: &str, body: &str) -> String {
        format!(
            "POST {uri} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
             Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        )
    }

    #[tokio::test]
    async fn missing_body_field_is_a_bad_request() {
        let (status, body) = send(post_json("/entries", r#"{"category":"infaq"}"#)).await;
        assert_eq!(status, 400);
        assert!(body["error"].as_str().unwrap().contains("amount"));
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let (status, body) = send(post_json("/entries", "{")).await;
        assert_eq!(status, 400);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_bad_request() {
        let (status, body) = send(get_request("/entries/abc")).await;
        assert_eq!(status, 400);
        assert!(body["error"].as_str().unwrap().contains("abc"));
    }

    #[tokio::test]
    async fn bad_query_is_a_bad_request() {
        let (status, body) = send(get_request("/entries?first=many")).await;
        assert_eq!(status, 400);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn accepted_requests_keep_the_data_envelope() {
        let (status, body) = send(post_json("/entries", r#"{"amount":"12.50"}"#)).await;
        assert_eq!(status, 200);
        assert_eq!(body["data"], "12.50");
        let (status, body) = send(get_request("/entries/7")).await;
        assert_eq!(status, 200);
        assert_eq!(body["data"], 7);
    }
}
