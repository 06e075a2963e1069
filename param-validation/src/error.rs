//! 🚨 검증 실패와 스키마 정의 오류

use std::fmt;

use serde_json::json;
use thiserror::Error;

use crate::{
    constraint::{choices, Constraint},
    schema::Source,
};

/// 필드 하나가 실패한 이유
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    #[error("field required")]
    MissingField,

    #[error("input should be a valid {expected}")]
    TypeCoercion { expected: &'static str },

    #[error("input should be {}", choices(.allowed))]
    InvalidChoice { allowed: Vec<String> },

    #[error("input should {constraint}")]
    ConstraintViolation { constraint: Constraint },

    #[error("extra inputs are not permitted")]
    ExtraForbidden,

    #[error("invalid JSON body: {message}")]
    InvalidJson { message: String },
}

impl ErrorKind {
    /// 422 응답의 `type` 값
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingField => "missing",
            ErrorKind::TypeCoercion { .. } => "type_error",
            ErrorKind::InvalidChoice { .. } => "invalid_choice",
            ErrorKind::ConstraintViolation { .. } => "constraint_violation",
            ErrorKind::ExtraForbidden => "extra_forbidden",
            ErrorKind::InvalidJson { .. } => "json_invalid",
        }
    }

    /// 422 응답의 `ctx` 값
    pub fn context(&self) -> Option<serde_json::Value> {
        match self {
            ErrorKind::InvalidChoice { allowed } => Some(json!({ "expected": allowed })),
            ErrorKind::ConstraintViolation { constraint } => serde_json::to_value(constraint).ok(),
            _ => None,
        }
    }
}

/// `(필드, 위반 내용, 입력값)` 하나
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub source: Source,
    /// 외부 이름(alias) 기준 경로. 중첩 모델이면 부모 이름이 앞에 붙습니다.
    pub path: Vec<String>,
    pub kind: ErrorKind,
    /// 사용자가 보낸 원래 값. 값이 없어서 실패했다면 `None`.
    pub input: Option<serde_json::Value>,
}

impl FieldError {
    pub fn new(
        source: Source,
        path: Vec<String>,
        kind: ErrorKind,
        input: Option<serde_json::Value>,
    ) -> Self {
        Self {
            source,
            path,
            kind,
            input,
        }
    }

    /// `filter.limit`
    pub fn field(&self) -> String {
        self.path.join(".")
    }

    /// `["query", "filter", "limit"]`
    pub fn loc(&self) -> Vec<String> {
        std::iter::once(self.source.to_string())
            .chain(self.path.iter().cloned())
            .collect()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.loc().join("."), self.kind)
    }
}

/// 한 번의 검증에서 쌓인 모든 실패. 첫 번째 실패에서 멈추지 않습니다.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// 스키마 정의 자체가 잘못된 경우 (서버 시작 시점에 드러나야 하는 오류)
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("duplicate field `{0}`")]
    DuplicateField(String),

    #[error("key `{key}` is read by more than one field in the {location}")]
    DuplicateKey { key: String, location: Source },

    #[error("field `{field}`: invalid pattern")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("field `{field}`: constraint `{constraint}` does not apply to type {ty}")]
    InapplicableConstraint {
        field: String,
        constraint: &'static str,
        ty: &'static str,
    },

    #[error("field `{field}`: default value is invalid ({reason})")]
    InvalidDefault { field: String, reason: ErrorKind },

    #[error("field `{field}`: type {ty} cannot be read from the {location}")]
    UnsupportedSource {
        field: String,
        ty: &'static str,
        location: Source,
    },
}
