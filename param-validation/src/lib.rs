//! 경로/쿼리/본문 파라미터를 선언형 스키마로 검증하고 타입을 변환하는 작은 엔진입니다.
//!
//! - `Schema` / `FieldSpec` 으로 입력 하나하나의 위치, 타입, 기본값, 제약 조건을 선언
//! - `Schema::validate` 가 원본 입력(`RawInput`)을 검사해서 변환된 값(`Values`) 또는
//!   모든 실패 목록(`ValidationErrors`)을 돌려줌
//! - `extract::Valid<T>` 는 같은 일을 Axum 핸들러 추출기로 해주고, 실패하면 422 응답
//!
//! ```rust
//! use param_validation::{FieldSpec, FieldType, RawInput, Schema};
//!
//! let schema = Schema::new([
//!     FieldSpec::path("item_id", FieldType::Integer).ge(1.0).le(1000.0),
//!     FieldSpec::query("q", FieldType::String).optional().min_length(3),
//! ])
//! .unwrap();
//!
//! let values = schema
//!     .validate(&RawInput::new().path("item_id", "5"))
//!     .unwrap();
//! assert_eq!(values.int("item_id"), Some(5));
//! ```

mod constraint;
mod engine;
mod error;
pub mod extract;
mod input;
mod schema;
mod value;

pub use constraint::Constraint;
pub use engine::validate;
pub use error::{ErrorKind, FieldError, SchemaError, ValidationErrors};
pub use extract::{ParamRejection, ParamSchema, Valid};
pub use input::RawInput;
pub use schema::{DefaultValue, FieldSpec, FieldType, Metadata, Schema, Source};
pub use value::{Value, Values};

#[cfg(test)]
mod tests;
