//! 상품 조회와 검색을 하는 작은 앱입니다.
//!
//! - `GET /products/{product_id}` : 경로 숫자 범위 + 필수 쿼리 문자열 길이 + 실수 범위
//! - `GET /search/` : 검색 조건을 모델 하나로 묶어서 받기
//!
//! ```not_rust
//! cargo run -p example-product-search
//!
//! curl '127.0.0.1:3000/products/7?q=shoe&size=42.5'
//! -> {"product_id":7,"q":"shoe","size":42.5}
//! curl '127.0.0.1:3000/search/?tags=new&tags=sale&order=desc'
//! -> {"limit":10,"tags":["new","sale"],"order":"desc"}
//! ```

use std::sync::LazyLock;

use axum::{routing::get, Json, Router};
use param_validation::{FieldSpec, FieldType, ParamSchema, Schema, Valid, Value};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 💻 메인 함수

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}=debug,param_validation=debug,tower_http=debug",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("APP_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_owned());
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::debug!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app()).await.unwrap();
}

fn app() -> Router {
    Router::new()
        .route("/products/{product_id}", get(find_product))
        .route("/search/", get(search))
        .layer(TraceLayer::new_for_http())
}

/// 🔍 상품 조회

#[derive(Debug, Deserialize, Serialize)]
struct ProductQuery {
    product_id: i64,
    q: String,
    size: f64,
}

impl ParamSchema for ProductQuery {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([
                FieldSpec::path("product_id", FieldType::Integer)
                    .ge(1.0)
                    .le(1000.0),
                FieldSpec::query("q", FieldType::String)
                    .min_length(2)
                    .max_length(20),
                FieldSpec::query("size", FieldType::Float).gt(0.0).lt(100.0),
            ])
            .expect("product query schema")
        });
        &SCHEMA
    }
}

async fn find_product(Valid(query): Valid<ProductQuery>) -> Json<ProductQuery> {
    Json(query)
}

/// 🗂️ 검색 조건 모델

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
enum Order {
    Asc,
    Desc,
}

impl Order {
    const ALL: [&'static str; 2] = ["asc", "desc"];
}

#[derive(Debug, Deserialize, Serialize)]
struct SearchParams {
    limit: i64,
    tags: Vec<String>,
    order: Order,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    params: SearchParams,
}

impl ParamSchema for SearchQuery {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            let params = Schema::new([
                FieldSpec::query("limit", FieldType::Integer)
                    .default(10)
                    .gt(0.0)
                    .le(100.0),
                FieldSpec::query("tags", FieldType::List).default_with(|| Value::List(Vec::new())),
                FieldSpec::query("order", FieldType::choice(Order::ALL)).default("asc"),
            ])
            .expect("search params schema");
            Schema::new([FieldSpec::query("params", FieldType::model(params))])
                .expect("search query schema")
        });
        &SCHEMA
    }
}

async fn search(Valid(query): Valid<SearchQuery>) -> Json<SearchParams> {
    tracing::debug!(params = ?query.params, "searching products");
    Json(query.params)
}

/// 🧪 테스트 코드
