//! 🔁 Axum 연결부: 요청에서 path/query/body 를 모아 엔진을 돌리고,
//! 검증이 끝난 값을 핸들러의 타입으로 바꿔 넘겨주는 `Valid<T>` 추출기

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::{
    error::{ErrorKind, FieldError, ValidationErrors},
    input::RawInput,
    schema::{Schema, Source},
};

/// 핸들러 파라미터 타입이 자기 스키마를 알려주는 트레잇
///
/// 스키마는 한 번만 만들어지도록 보통 `LazyLock` 정적 변수에 둡니다.
pub trait ParamSchema {
    fn schema() -> &'static Schema;
}

/// 검증을 통과한 파라미터
///
/// `T` 의 필드 이름은 스키마의 내부 이름(alias 가 아닌 이름)과 같아야 합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct Valid<T>(pub T);

impl<T, S> FromRequest<S> for Valid<T>
where
    T: DeserializeOwned + ParamSchema,
    S: Send + Sync,
{
    type Rejection = ParamRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let schema = T::schema();
        let (mut parts, body) = req.into_parts();

        // 경로 파라미터가 없는 라우트에서 Path 를 꺼내면 실패하므로 필요할 때만 추출
        let path = if schema.uses(Source::Path) {
            let Path(path) = Path::<HashMap<String, String>>::from_request_parts(&mut parts, state).await?;
            path
        } else {
            HashMap::new()
        };

        // Vec<(키, 값)> 으로 받아야 q=foo&q=bar 의 순서와 중복이 유지됨
        let Query(query) = Query::<Vec<(String, String)>>::from_request_parts(&mut parts, state).await?;

        let body = if schema.uses(Source::Body) {
            let bytes = Bytes::from_request(Request::from_parts(parts, body), state).await?;
            parse_body(&bytes)?
        } else {
            None
        };

        let values = schema.validate(&RawInput::from_parts(path, query, body))?;
        let value = serde_json::from_value(values.to_json()).map_err(ParamRejection::Bind)?;
        Ok(Valid(value))
    }
}

/// 빈 본문은 "본문 없음", 깨진 JSON 은 422
fn parse_body(bytes: &[u8]) -> Result<Option<serde_json::Value>, ValidationErrors> {
    if bytes.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(bytes).map(Some).map_err(|err| {
        ValidationErrors::new(vec![FieldError::new(
            Source::Body,
            Vec::new(),
            ErrorKind::InvalidJson {
                message: err.to_string(),
            },
            None,
        )])
    })
}

/// `Valid<T>` 추출 실패
#[derive(Debug, Error)]
pub enum ParamRejection {
    // 엔진이 돌려준 검증 실패 목록
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Path(#[from] PathRejection),

    #[error(transparent)]
    Query(#[from] QueryRejection),

    #[error(transparent)]
    Body(#[from] BytesRejection),

    // 검증은 통과했지만 핸들러 타입과 스키마가 맞지 않는 경우 (서버 쪽 실수)
    #[error("validated values do not fit the handler type: {0}")]
    Bind(#[source] serde_json::Error),
}

/// 422 응답의 항목 하나
#[derive(Debug, Serialize)]
struct ErrorDetail {
    loc: Vec<String>,
    #[serde(rename = "type")]
    kind: &'static str,
    msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ctx: Option<serde_json::Value>,
}

impl From<&FieldError> for ErrorDetail {
    fn from(error: &FieldError) -> Self {
        Self {
            loc: error.loc(),
            kind: error.kind.code(),
            msg: error.kind.to_string(),
            input: error.input.clone(),
            ctx: error.kind.context(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: Vec<ErrorDetail>,
}

impl IntoResponse for ParamRejection {
    fn into_response(self) -> Response {
        match self {
            // 실패한 필드마다 항목 하나씩
            ParamRejection::Invalid(errors) => {
                tracing::debug!(%errors, "rejecting request parameters");
                let body = ErrorBody {
                    detail: errors.errors().iter().map(ErrorDetail::from).collect(),
                };
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            ParamRejection::Path(rejection) => rejection.into_response(),
            ParamRejection::Query(rejection) => rejection.into_response(),
            ParamRejection::Body(rejection) => rejection.into_response(),
            // 클라이언트에게 자세한 내부 오류는 노출하지 않음
            ParamRejection::Bind(err) => {
                tracing::error!(%err, "failed to bind validated parameters");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_owned(),
                )
                    .into_response()
            }
        }
    }
}
