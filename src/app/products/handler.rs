//! 产品处理器

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::Json,
};
use serde_json::Value;
use tracing::{error, info};

use super::{
    model::{Product, ProductId},
    validation::validate_create_payload,
};
use crate::app::AppState;
use crate::core::{
    auth::Gate,
    error::CoreError,
    response::ListResponse,
};

/// `GET /products/:id` 的门禁
pub const READ_GATES: &[Gate] = &[Gate::Authenticated];
/// `POST /products` 的门禁
pub const WRITE_GATES: &[Gate] = &[Gate::Authenticated, Gate::Role("admin")];

pub async fn list_products(State(state): State<AppState>) -> Json<ListResponse<Product>> {
    let result = state.product_service.list_products();
    info!("GET /products - Returning {} products", result.count);
    Json(result)
}

pub async fn get_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Result<Json<Product>, CoreError> {
    state.guard.check(&headers, READ_GATES)?;

    let Some(id) = parse_id(&raw_id)? else {
        error!("GET /products/{} - Product not found", raw_id);
        return Err(CoreError::NotFound(format!(
            "Product with ID {} not found",
            raw_id
        )));
    };
    info!("GET /products/{} - Fetching product details", id);

    match state.product_service.get_product(id) {
        Ok(product) => {
            info!("GET /products/{} - Product found", id);
            Ok(Json(product))
        }
        Err(err) => {
            error!("GET /products/{} - Product not found: {}", id, err);
            Err(err)
        }
    }
}

pub async fn create_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Product>), CoreError> {
    let identity = state.guard.check(&headers, WRITE_GATES)?;
    info!(
        subject = identity.as_ref().map(|i| i.subject.as_str()),
        "POST /products - Creating product"
    );

    let payload = parse_body(&headers, &body)?;
    let candidate = validate_create_payload(&payload)?;
    let product = state.product_service.create_product(candidate);

    info!("POST /products - Created product {}", product.id);
    Ok((StatusCode::CREATED, Json(product)))
}

/// 只接受 `-?\d+` 形式的 id
///
/// 超出 `ProductId` 范围的数字返回 `None`，这样的 id 不可能存在。
fn parse_id(raw: &str) -> Result<Option<ProductId>, CoreError> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::BadRequest(
            "Validation failed (numeric string is expected)".to_string(),
        ));
    }

    Ok(raw.parse::<ProductId>().ok())
}

fn is_json_content(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(';').next())
        .map(|essence| {
            let essence = essence.trim().to_ascii_lowercase();
            essence == "application/json" || essence.ends_with("+json")
        })
        .unwrap_or(false)
}

/// 非 JSON 的请求体和空请求体都视为空对象
fn parse_body(headers: &HeaderMap, body: &[u8]) -> Result<Value, CoreError> {
    if !is_json_content(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_slice(body)
        .map_err(|e| CoreError::BadRequest(format!("Malformed JSON body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    #[test]
    fn parse_id_accepts_integers() {
        assert_eq!(parse_id("1").unwrap(), Some(1));
        assert_eq!(parse_id("999").unwrap(), Some(999));
        assert_eq!(parse_id("-1").unwrap(), Some(-1));
    }

    #[test]
    fn parse_id_out_of_range_is_absent() {
        assert_eq!(parse_id("99999999999999999999").unwrap(), None);
    }

    #[test]
    fn parse_id_rejects_non_numeric() {
        for raw in ["abc", "1.5", "", "12abc", "+5", "-", " 5", "5 "] {
            let err = parse_id(raw).unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "input {:?}", raw);
        }
    }

    #[test]
    fn empty_body_is_empty_object() {
        let headers = json_headers();
        assert_eq!(parse_body(&headers, b"").unwrap(), Value::Object(Default::default()));
        assert_eq!(parse_body(&headers, b"  \n").unwrap(), Value::Object(Default::default()));
    }

    #[test]
    fn malformed_body_is_bad_request() {
        let err = parse_body(&json_headers(), b"{\"name\":").unwrap_err();
        assert!(matches!(err, CoreError::BadRequest(_)));
    }

    #[test]
    fn json_content_types() {
        let mut headers = HeaderMap::new();
        assert!(!is_json_content(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("Application/JSON; charset=utf-8"));
        assert!(is_json_content(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/merge-patch+json"));
        assert!(is_json_content(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!is_json_content(&headers));
    }

    #[test]
    fn non_json_body_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        let body = br#"{"name":"Widget"}"#;
        assert_eq!(parse_body(&headers, body).unwrap(), Value::Object(Default::default()));
        assert_eq!(parse_body(&HeaderMap::new(), body).unwrap(), Value::Object(Default::default()));
    }
}
