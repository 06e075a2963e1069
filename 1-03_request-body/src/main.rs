//! 요청 본문(Request Body) 예제입니다.
//!
//! 1. 요청 본문을 JSON 으로 읽고
//! 2. `Item` 모델 스키마로 필드를 하나씩 검사하고 변환한 뒤 (`"12.5"` → 12.5)
//! 3. 통과하면 핸들러에 `Item` 으로 넘기고, 실패하면 어떤 필드가 왜 틀렸는지 담아 422 로 응답
//!
//! ```not_rust
//! cargo run -p example-request-body
//!
//! curl -X POST 127.0.0.1:3000/items/ \
//!   -H 'content-type: application/json' \
//!   -d '{"name":"Foo","price":35.4}'
//! -> {"name":"Foo","description":null,"price":35.4,"tax":null}
//! ```

use std::sync::LazyLock;

use axum::{routing::post, Json, Router};
use param_validation::{FieldSpec, FieldType, ParamSchema, Schema, Valid};
use serde::{Deserialize, Serialize};
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
        .route("/items/", post(create_item))
        .layer(TraceLayer::new_for_http())
}

/// 📦 본문 모델
///
/// `description`, `tax` 는 선택 필드라서 없거나 `null` 이면 `None` 이 됩니다.
#[derive(Debug, Deserialize, Serialize)]
struct Item {
    name: String,
    description: Option<String>,
    price: f64,
    tax: Option<f64>,
}

fn item_schema() -> Schema {
    Schema::new([
        FieldSpec::body("name", FieldType::String),
        FieldSpec::body("description", FieldType::String).optional(),
        FieldSpec::body("price", FieldType::Float),
        FieldSpec::body("tax", FieldType::Float).optional(),
    ])
    .expect("item schema")
}

#[derive(Debug, Deserialize)]
struct CreateItem {
    item: Item,
}

impl ParamSchema for CreateItem {
    fn schema() -> &'static Schema {
        // 모델 필드 하나가 본문 전체를 차지 (embed 아님)
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([FieldSpec::body("item", FieldType::model(item_schema()))])
                .expect("create item schema")
        });
        &SCHEMA
    }
}

async fn create_item(Valid(CreateItem { item }): Valid<CreateItem>) -> Json<Item> {
    tracing::debug!(?item, "item created");
    Json(item)
}

/// 🧪 테스트 코드
