use axum::{
    Router,
    body::Body,
    http::{Method, Request, header},
    response::Response,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use struk_ai::server::{self, AppState};

use super::mocks::MockModelClient;

pub const BOUNDARY: &str = "----struk-test-boundary";

pub const TEST_UPLOAD_LIMIT: usize = 1024 * 1024;

pub const HPP_SAMPLE_INPUT: &str = "nama produk = Kopi Susu
bahan:
- nama bahan = kopi, satuan = gram, harga beli = 5000
- nama bahan = susu, satuan = ml, harga beli = 7000
biaya operasional:
biaya tenaga kerja per hari = 50000
biaya overhead per hari = 20000
jumlah produk atau unit = 40
deskripsi tambahan = dijual dekat kampus";

/// Router wired to the given mock, plus a handle to inspect its calls.
pub fn create_test_app(mock: MockModelClient) -> (Router, MockModelClient) {
    let app = server::router(AppState::new(Arc::new(mock.clone())), TEST_UPLOAD_LIMIT);
    (app, mock)
}

pub fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn multipart_request(field: &str, content_type: Option<&str>, data: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"struk.bin\"\r\n",
        BOUNDARY, field
    );
    if let Some(content_type) = content_type {
        body.push_str(&format!("Content-Type: {}\r\n", content_type));
    }
    body.push_str("\r\n");

    let mut bytes = body.into_bytes();
    bytes.extend_from_slice(data);
    bytes.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/ocr")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(bytes))
        .unwrap()
}

pub async fn read_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
