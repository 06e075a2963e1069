//! 쿼리 매개변수(Query Params) 예제입니다.
//!
//! 경로에 없는 매개변수는 쿼리 매개변수가 됩니다.
//! `/results?search_query=axum` 이라면
//! - `/results` : 경로
//! - `?search_query=axum` : 쿼리 매개변수
//!
//! ```not_rust
//! cargo run -p example-query-params
//!
//! curl '127.0.0.1:3000/items/?skip=1&limit=2'
//! -> [{"item_name":"Banana"},{"item_name":"Cherry"}]
//! curl 127.0.0.1:3000/user-items/foo-item
//! -> 422 (needy 누락)
//! curl '127.0.0.1:3000/user-items/foo-item?needy=sooooneedy'
//! -> {"item_id":"foo-item","needy":"sooooneedy"}
//! ```

use std::sync::LazyLock;

use axum::{routing::get, Json, Router};
use param_validation::{FieldSpec, FieldType, ParamSchema, Schema, Valid};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 🏁 main()

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
        .route("/items/", get(read_items))
        .route("/items/{item_id}", get(read_item))
        .route("/user-items/{item_id}", get(read_user_item))
        .layer(TraceLayer::new_for_http())
}

// 가짜 데이터베이스
#[derive(Debug, Clone, Serialize)]
struct FakeItem {
    item_name: &'static str,
}

const FAKE_ITEMS_DB: [FakeItem; 4] = [
    FakeItem { item_name: "Apple" },
    FakeItem { item_name: "Banana" },
    FakeItem { item_name: "Cherry" },
    FakeItem { item_name: "Durian" },
];

/// 📚 페이지네이션
/// - `skip`: 앞에서부터 몇 개의 아이템을 건너뛸지
/// - `limit`: 한 페이지에 몇 개의 아이템을 보여줄지

#[derive(Debug, Deserialize)]
struct Pagination {
    skip: usize,
    limit: usize,
}

impl ParamSchema for Pagination {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([
                // skip 의 기본값은 0, limit 의 기본값은 10
                FieldSpec::query("skip", FieldType::Integer).default(0).ge(0.0),
                FieldSpec::query("limit", FieldType::Integer).default(10).ge(0.0),
            ])
            .expect("pagination schema")
        });
        &SCHEMA
    }
}

async fn read_items(Valid(page): Valid<Pagination>) -> Json<Vec<FakeItem>> {
    let items = FAKE_ITEMS_DB
        .iter()
        .skip(page.skip)
        .take(page.limit)
        .cloned()
        .collect();
    Json(items)
}

/// ❓ 선택적 매개변수
/// 경로에 없는 매개변수는 쿼리 매개변수가 됩니다. q 는 없어도 됩니다.

#[derive(Debug, Deserialize)]
struct ReadItem {
    item_id: String,
    q: Option<String>,
}

impl ParamSchema for ReadItem {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([
                FieldSpec::path("item_id", FieldType::String),
                FieldSpec::query("q", FieldType::String).optional(),
            ])
            .expect("read item schema")
        });
        &SCHEMA
    }
}

async fn read_item(Valid(params): Valid<ReadItem>) -> Json<Value> {
    // q 가 있으면 함께 반환
    match params.q {
        Some(q) => Json(json!({ "item_id": params.item_id, "q": q })),
        None => Json(json!({ "item_id": params.item_id })),
    }
}

/// ❗ 필수 쿼리 매개변수
/// 기본값이 없으면 필수가 됩니다.

#[derive(Debug, Deserialize, Serialize)]
struct UserItem {
    item_id: String,
    needy: String,
}

impl ParamSchema for UserItem {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([
                FieldSpec::path("item_id", FieldType::String),
                FieldSpec::query("needy", FieldType::String),
            ])
            .expect("user item schema")
        });
        &SCHEMA
    }
}

async fn read_user_item(Valid(item): Valid<UserItem>) -> Json<UserItem> {
    Json(item)
}

/// 🧪 테스트 코드
