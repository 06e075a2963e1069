//! 경로 매개변수와 숫자 검증 예제입니다.
//!
//! 쿼리 매개변수처럼 경로 매개변수에도 같은 방식으로 검증과 메타데이터를 붙일 수 있습니다.
//! - `ge` : 크거나 같음, `gt` : 큼
//! - `le` : 작거나 같음, `lt` : 작음
//!
//! ```not_rust
//! cargo run -p example-path-numeric-validation
//!
//! curl '127.0.0.1:3000/items3/42?q=foo&size=3.5'
//! -> {"item_id":42,"q":"foo","size":3.5}
//! curl '127.0.0.1:3000/items3/1001?q=foo&size=10.5'
//! -> 422 (item_id, size 두 개의 실패)
//! ```

use std::sync::LazyLock;

use axum::{routing::get, Json, Router};
use param_validation::{FieldSpec, FieldType, ParamSchema, Schema, Valid};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

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
        .route("/items/{item_id}", get(read_item))
        .route("/items2/{item_id}", get(read_item_with_query))
        .route("/items3/{item_id}", get(read_item_with_size))
        .layer(TraceLayer::new_for_http())
}

fn item_id() -> FieldSpec {
    FieldSpec::path("item_id", FieldType::Integer).title("The ID of the item to get")
}

/// 🔢 경로 매개변수 + 메타데이터

#[derive(Debug, Deserialize)]
struct ItemQuery {
    item_id: i64,
    q: Option<String>,
}

impl ParamSchema for ItemQuery {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([
                item_id()
                    .description("A unique integer that identifies the item")
                    .ge(1.0),
                FieldSpec::query("q", FieldType::String)
                    .alias("item-query")
                    .optional()
                    .title("Item Query")
                    .description("Query string for searching items"),
            ])
            .expect("item query schema")
        });
        &SCHEMA
    }
}

async fn read_item(Valid(params): Valid<ItemQuery>) -> Json<Value> {
    let mut results = json!({ "item_id": params.item_id });
    if let Some(q) = params.q {
        results["q"] = q.into();
    }
    Json(results)
}

/// ❗ 기본값 없는 쿼리는 경로 매개변수 옆에 있어도 필수

#[derive(Debug, Deserialize, Serialize)]
struct RequiredQuery {
    item_id: i64,
    q: String,
}

impl ParamSchema for RequiredQuery {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([item_id(), FieldSpec::query("q", FieldType::String)])
                .expect("required query schema")
        });
        &SCHEMA
    }
}

async fn read_item_with_query(Valid(params): Valid<RequiredQuery>) -> Json<RequiredQuery> {
    Json(params)
}

/// 📏 정수 범위와 실수 범위

#[derive(Debug, Deserialize, Serialize)]
struct SizedQuery {
    item_id: i64,
    q: String,
    size: f64,
}

impl ParamSchema for SizedQuery {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([
                item_id().ge(0.0).le(1000.0),
                FieldSpec::query("q", FieldType::String),
                FieldSpec::query("size", FieldType::Float).gt(0.0).lt(10.5),
            ])
            .expect("sized query schema")
        });
        &SCHEMA
    }
}

async fn read_item_with_size(Valid(params): Valid<SizedQuery>) -> Json<SizedQuery> {
    Json(params)
}

/// 🧪 테스트 코드
