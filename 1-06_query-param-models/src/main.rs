//! 쿼리 매개변수 모델 예제입니다.
//!
//! `limit`, `offset`, `order_by`, `tags` 쿼리 매개변수를 하나의 모델(`FilterParams`)로 묶어서 받습니다.
//! 모델 밖에서 온 쿼리 키를 거부하고 싶다면 스키마에 `forbid_extra()` 를 붙입니다 (`/strict/items/`).
//!
//! ```not_rust
//! cargo run -p example-query-param-models
//!
//! curl '127.0.0.1:3000/items/?limit=10&tags=hi&tags=hello&tags=nihao'
//! -> {"limit":10,"offset":0,"order_by":"created_at","tags":["hi","hello","nihao"]}
//! curl '127.0.0.1:3000/strict/items/?tool=plumbus'
//! -> 422 (extra_forbidden)
//! ```

use std::sync::LazyLock;

use axum::{routing::get, Json, Router};
use param_validation::{FieldSpec, FieldType, ParamSchema, Schema, Valid, Value};
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
        .route("/items/", get(read_items))
        .route("/strict/items/", get(read_items_strict))
        .layer(TraceLayer::new_for_http())
}

/// 정렬 기준. 이 두 값만 들어올 수 있습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
enum OrderBy {
    CreatedAt,
    UpdatedAt,
}

impl OrderBy {
    const ALL: [&'static str; 2] = ["created_at", "updated_at"];
}

/// 🧺 쿼리 매개변수 모델
#[derive(Debug, Deserialize, Serialize)]
struct FilterParams {
    limit: i64,
    offset: i64,
    order_by: OrderBy,
    tags: Vec<String>,
}

fn filter_schema() -> Schema {
    Schema::new([
        FieldSpec::query("limit", FieldType::Integer)
            .default(100)
            .gt(0.0)
            .le(100.0),
        FieldSpec::query("offset", FieldType::Integer).default(0).ge(0.0),
        FieldSpec::query("order_by", FieldType::choice(OrderBy::ALL)).default("created_at"),
        // 빈 목록을 값으로 공유하지 않고 매번 새로 만듦
        FieldSpec::query("tags", FieldType::List).default_with(|| Value::List(Vec::new())),
    ])
    .expect("filter schema")
}

#[derive(Debug, Deserialize)]
struct ItemsQuery {
    filter_query: FilterParams,
}

impl ParamSchema for ItemsQuery {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([FieldSpec::query(
                "filter_query",
                FieldType::model(filter_schema()),
            )])
            .expect("items query schema")
        });
        &SCHEMA
    }
}

async fn read_items(Valid(query): Valid<ItemsQuery>) -> Json<FilterParams> {
    Json(query.filter_query)
}

/// 🚫 추가 쿼리 매개변수 금지

#[derive(Debug, Deserialize)]
struct StrictItemsQuery {
    filter_query: FilterParams,
}

impl ParamSchema for StrictItemsQuery {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([FieldSpec::query(
                "filter_query",
                FieldType::model(filter_schema().forbid_extra()),
            )])
            .expect("strict items query schema")
        });
        &SCHEMA
    }
}

async fn read_items_strict(Valid(query): Valid<StrictItemsQuery>) -> Json<FilterParams> {
    Json(query.filter_query)
}

/// 🧪 테스트 코드

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn collects_the_model_from_flat_query_params() {
        let (status, body) = get_json("/items/?limit=10&tags=hi&tags=hello&tags=nihao").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "limit": 10,
                "offset": 0,
                "order_by": "created_at",
                "tags": ["hi", "hello", "nihao"]
            })
        );
    }

    #[tokio::test]
    async fn defaults_only() {
        let (_, body) = get_json("/items/").await;
        assert_eq!(
            body,
            json!({ "limit": 100, "offset": 0, "order_by": "created_at", "tags": [] })
        );
    }

    #[tokio::test]
    async fn order_by_accepts_literals_only() {
        let (_, body) = get_json("/items/?order_by=updated_at").await;
        assert_eq!(body["order_by"], "updated_at");

        let (status, body) = get_json("/items/?order_by=name").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["detail"][0]["loc"],
            json!(["query", "filter_query", "order_by"])
        );
        assert_eq!(
            body["detail"][0]["msg"],
            "input should be 'created_at' or 'updated_at'"
        );
    }

    #[tokio::test]
    async fn nested_failures_keep_the_model_prefix() {
        let (status, body) = get_json("/items/?limit=0&offset=-1").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let locs: Vec<&serde_json::Value> = body["detail"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| &d["loc"])
            .collect();
        assert_eq!(
            locs,
            [
                &json!(["query", "filter_query", "limit"]),
                &json!(["query", "filter_query", "offset"])
            ]
        );
    }

    #[tokio::test]
    async fn unknown_keys_are_ignored_by_default() {
        let (status, _) = get_json("/items/?tool=plumbus").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn strict_model_rejects_unknown_keys() {
        let (status, body) = get_json("/strict/items/?limit=5&tool=plumbus").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["detail"],
            json!([{
                "loc": ["query", "filter_query", "tool"],
                "type": "extra_forbidden",
                "msg": "extra inputs are not permitted",
                "input": "plumbus"
            }])
        );

        let (status, body) = get_json("/strict/items/?limit=5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["limit"], 5);
    }
}
