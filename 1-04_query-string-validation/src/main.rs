//! 쿼리 매개변수와 문자열 검증 예제입니다.
//!
//! - 최소/최대 길이, 정규식 (`/items/`)
//! - 기본값이 있는 쿼리 (`/items2/`)
//! - 같은 키를 여러 번 보내는 다중 값 쿼리 (`/items3/`, `/items4/`)
//! - 제목/설명 메타데이터, alias, deprecated (`/items5/` ~ `/items7/`)
//!
//! ```not_rust
//! cargo run -p example-query-string-validation
//!
//! curl '127.0.0.1:3000/items3/?q=foo&q=bar'
//! -> {"items":[{"item_id":"Foo"},{"item_id":"Bar"}],"q":["foo","bar"]}
//! curl '127.0.0.1:3000/items/?q=nope'
//! -> 422
//! ```

use std::sync::LazyLock;

use axum::{routing::get, Json, Router};
use param_validation::{FieldSpec, FieldType, ParamSchema, Schema, Valid, Value as ParamValue};
use serde::Deserialize;
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
        .route("/items/", get(read_items))
        .route("/items2/", get(read_items_with_default))
        .route("/items3/", get(read_items_multi))
        .route("/items4/", get(read_items_list))
        .route("/items5/", get(read_items_documented))
        .route("/items6/", get(read_items_aliased))
        .route("/items7/", get(read_items_deprecated))
        .layer(TraceLayer::new_for_http())
}

const QUERY_TITLE: &str = "Query string";
const QUERY_DESCRIPTION: &str =
    "Query string for the items to search in the database that have a good match";

// 매 요청마다 새로 만들어 돌려주는 결과 (요청끼리 상태를 공유하지 않음)
fn results(q: Option<Value>) -> Json<Value> {
    let mut results = json!({ "items": [{ "item_id": "Foo" }, { "item_id": "Bar" }] });
    if let Some(q) = q {
        results["q"] = q;
    }
    Json(results)
}

#[derive(Debug, Deserialize)]
struct Search {
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchWithDefault {
    q: String,
}

#[derive(Debug, Deserialize)]
struct MultiSearch {
    q: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ListSearch {
    q: Vec<String>,
}

/// ✂️ 최소, 최대 길이 + 정규식
///
/// 정규식은 값 전체와 맞아야 합니다. `fixedquery` 만 통과합니다.

impl ParamSchema for Search {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([FieldSpec::query("q", FieldType::String)
                .optional()
                .min_length(3)
                .max_length(50)
                .pattern("^fixedquery$")])
            .expect("search schema")
        });
        &SCHEMA
    }
}

async fn read_items(Valid(search): Valid<Search>) -> Json<Value> {
    results(search.q.map(Value::from))
}

impl ParamSchema for SearchWithDefault {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([FieldSpec::query("q", FieldType::String)
                .default("fixedquery")
                .min_length(3)])
            .expect("search with default schema")
        });
        &SCHEMA
    }
}

async fn read_items_with_default(Valid(search): Valid<SearchWithDefault>) -> Json<Value> {
    results(Some(search.q.into()))
}

/// 📑 다중 값 쿼리
///
/// `?q=foo&q=bar` 처럼 같은 키가 여러 번 오면 목록으로 받습니다.

impl ParamSchema for MultiSearch {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([FieldSpec::query("q", FieldType::List).optional()])
                .expect("multi search schema")
        });
        &SCHEMA
    }
}

async fn read_items_multi(Valid(search): Valid<MultiSearch>) -> Json<Value> {
    results(search.q.map(Value::from))
}

impl ParamSchema for ListSearch {
    fn schema() -> &'static Schema {
        // 기본 목록은 요청마다 새로 만듦
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([
                FieldSpec::query("q", FieldType::List).default_with(|| ParamValue::List(Vec::new()))
            ])
            .expect("list search schema")
        });
        &SCHEMA
    }
}

async fn read_items_list(Valid(search): Valid<ListSearch>) -> Json<Value> {
    Json(json!({ "q": search.q }))
}

/// 🏷️ 메타데이터, alias, deprecated

impl ParamSchema for DocumentedSearch {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([FieldSpec::query("q", FieldType::String)
                .optional()
                .title(QUERY_TITLE)
                .description(QUERY_DESCRIPTION)
                .min_length(3)])
            .expect("documented search schema")
        });
        &SCHEMA
    }
}

#[derive(Debug, Deserialize)]
struct DocumentedSearch {
    q: Option<String>,
}

async fn read_items_documented(Valid(search): Valid<DocumentedSearch>) -> Json<Value> {
    results(search.q.map(Value::from))
}

// item-query 는 Rust 식별자로 쓸 수 없으니 필드 이름은 q, 쿼리 키는 alias
#[derive(Debug, Deserialize)]
struct AliasedSearch {
    q: Option<String>,
}

impl ParamSchema for AliasedSearch {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([FieldSpec::query("q", FieldType::String)
                .alias("item-query")
                .optional()])
            .expect("aliased search schema")
        });
        &SCHEMA
    }
}

async fn read_items_aliased(Valid(search): Valid<AliasedSearch>) -> Json<Value> {
    results(search.q.map(Value::from))
}

#[derive(Debug, Deserialize)]
struct DeprecatedSearch {
    q: Option<String>,
}

impl ParamSchema for DeprecatedSearch {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([FieldSpec::query("q", FieldType::String)
                .alias("item-query")
                .optional()
                .title(QUERY_TITLE)
                .description(QUERY_DESCRIPTION)
                .min_length(3)
                .max_length(50)
                .pattern("^fixedquery$")
                .deprecated()])
            .expect("deprecated search schema")
        });
        &SCHEMA
    }
}

// deprecated 는 동작을 바꾸지 않고 경고 로그만 남김
async fn read_items_deprecated(Valid(search): Valid<DeprecatedSearch>) -> Json<Value> {
    results(search.q.map(Value::from))
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
    use tower::ServiceExt;

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn items() -> Value {
        json!([{ "item_id": "Foo" }, { "item_id": "Bar" }])
    }

    #[tokio::test]
    async fn pattern_accepts_fixedquery_only() {
        let (status, body) = get_json("/items/?q=fixedquery").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "items": items(), "q": "fixedquery" }));

        let (status, body) = get_json("/items/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "items": items() }));
    }

    #[tokio::test]
    async fn short_input_fails_both_length_and_pattern() {
        let (status, body) = get_json("/items/?q=ab").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let contexts: Vec<&Value> = body["detail"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| &d["ctx"])
            .collect();
        assert_eq!(
            contexts,
            [
                &json!({ "min_length": 3 }),
                &json!({ "pattern": "^fixedquery$" })
            ]
        );
    }

    #[tokio::test]
    async fn pattern_is_anchored() {
        let (status, _) = get_json("/items/?q=fixedquery2").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = get_json("/items/?q=nofixedquery").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn default_is_used_when_absent() {
        let (_, body) = get_json("/items2/").await;
        assert_eq!(body["q"], "fixedquery");

        let (status, _) = get_json("/items2/?q=no").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn repeated_keys_become_a_list() {
        let (status, body) = get_json("/items3/?q=foo&q=bar").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["q"], json!(["foo", "bar"]));

        let (_, body) = get_json("/items3/").await;
        assert_eq!(body, json!({ "items": items() }));
    }

    #[tokio::test]
    async fn list_default_is_fresh_per_request() {
        let (_, body) = get_json("/items4/?q=foo").await;
        assert_eq!(body, json!({ "q": ["foo"] }));

        // 앞 요청의 값이 기본값에 남아 있으면 안 됨
        let (_, body) = get_json("/items4/").await;
        assert_eq!(body, json!({ "q": [] }));
    }

    #[tokio::test]
    async fn metadata_does_not_change_validation() {
        let (status, body) = get_json("/items5/?q=abc").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["q"], "abc");

        let (status, _) = get_json("/items5/?q=ab").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn alias_is_the_query_key() {
        let (_, body) = get_json("/items6/?item-query=foo").await;
        assert_eq!(body["q"], "foo");

        // 내부 이름으로 보내면 없는 것과 같음
        let (_, body) = get_json("/items6/?q=foo").await;
        assert_eq!(body, json!({ "items": items() }));
    }

    #[tokio::test]
    async fn deprecated_parameter_still_validates() {
        let (status, body) = get_json("/items7/?item-query=fixedquery").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["q"], "fixedquery");

        let (status, body) = get_json("/items7/?item-query=foo").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"][0]["loc"], json!(["query", "item-query"]));
    }
}
