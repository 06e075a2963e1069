//! 경로 매개변수(Path Params)를 타입과 함께 선언하고 검증하는 예제입니다.
//!
//! - `/items/{item_id}` : 정수 경로 매개변수 (`/items/foo` → 422)
//! - `/users/me` 와 `/users/{user_id}` : 고정 경로를 먼저 등록해야 하는 이유
//! - `/models/{model_name}` : 미리 정해진 값(Enum)만 허용
//! - `/files/{*file_path}` : 슬래시를 포함한 나머지 경로 전체를 받는 경로 변환기
//!
//! ```not_rust
//! cargo run -p example-path-params
//!
//! curl 127.0.0.1:3000/items/3
//! -> {"item_id":3}
//! curl 127.0.0.1:3000/files/home/johndoe/myfile.txt
//! -> {"file_path":"home/johndoe/myfile.txt"}
//! ```

use std::sync::LazyLock;

use axum::{routing::get, Json, Router};
use param_validation::{FieldSpec, FieldType, ParamSchema, Schema, Valid};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 💻 메인 함수

#[tokio::main]
async fn main() {
    // ✨ tracing 설정: 환경 변수 기반 필터와 포맷터를 등록하여 로깅 초기화
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

    // ✨ 바인딩 주소는 APP_ADDR 환경 변수로 바꿀 수 있음
    let addr = std::env::var("APP_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_owned());
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::debug!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app()).await.unwrap();
}

/// 🧭 라우터 구성
fn app() -> Router {
    Router::new()
        .route("/items/{item_id}", get(read_item))
        // /users/me 가 /users/{user_id} 보다 먼저 있어야 합니다.
        // 순서가 바뀌면 /users/me 요청이 user_id = "me" 로 처리될 수 있습니다.
        .route("/users/me", get(read_user_me))
        .route("/users/{user_id}", get(read_user))
        .route("/models/{model_name}", get(get_model))
        // 슬래시를 포함한 나머지 경로 전체
        .route("/files/{*file_path}", get(read_file))
        .layer(TraceLayer::new_for_http())
}

/// ✅ 정수 경로 매개변수

#[derive(Debug, Deserialize)]
struct ItemPath {
    item_id: i64,
}

impl ParamSchema for ItemPath {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([FieldSpec::path("item_id", FieldType::Integer)]).expect("item schema")
        });
        &SCHEMA
    }
}

// item_id 에 문자열이 들어오면 422
async fn read_item(Valid(path): Valid<ItemPath>) -> Json<Value> {
    Json(json!({ "item_id": path.item_id }))
}

/// 👤 고정 경로 vs 매개변수 경로

async fn read_user_me() -> Json<Value> {
    Json(json!({ "user_id": "the current user" }))
}

#[derive(Debug, Deserialize)]
struct UserPath {
    user_id: String,
}

impl ParamSchema for UserPath {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([FieldSpec::path("user_id", FieldType::String)]).expect("user schema")
        });
        &SCHEMA
    }
}

async fn read_user(Valid(path): Valid<UserPath>) -> Json<Value> {
    Json(json!({ "user_id": path.user_id }))
}

/// 🧠 사전 정의 값 (Enum)
///
/// 허용 값 목록은 스키마가 검사하고, 통과한 문자열은 serde 가 이 열거형으로 바꿉니다.
/// 값 비교만 하면 되므로 싱글톤 같은 특별한 정체성은 필요 없습니다.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
enum ModelName {
    Alexnet,
    Resnet,
    Lenet,
}

impl ModelName {
    const ALL: [&'static str; 3] = ["alexnet", "resnet", "lenet"];
}

#[derive(Debug, Deserialize)]
struct ModelPath {
    model_name: ModelName,
}

impl ParamSchema for ModelPath {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([FieldSpec::path(
                "model_name",
                FieldType::choice(ModelName::ALL),
            )])
            .expect("model schema")
        });
        &SCHEMA
    }
}

async fn get_model(Valid(path): Valid<ModelPath>) -> Json<Value> {
    let message = match path.model_name {
        ModelName::Alexnet => "Deep Learning FTW!",
        ModelName::Lenet => "LeCNN all the images",
        ModelName::Resnet => "Have some residuals",
    };
    Json(json!({ "model_name": path.model_name, "message": message }))
}

/// 📁 경로 변환기

#[derive(Debug, Deserialize)]
struct FilePath {
    file_path: String,
}

impl ParamSchema for FilePath {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new([FieldSpec::path("file_path", FieldType::String)]).expect("file schema")
        });
        &SCHEMA
    }
}

async fn read_file(Valid(path): Valid<FilePath>) -> Json<Value> {
    Json(json!({ "file_path": path.file_path }))
}

/// 🧪 테스트 코드
