//! 라우터가 넘겨주는 가공 전 입력 (경로 세그먼트, 쿼리 키/값, JSON 본문)

use std::collections::HashMap;

/// 요청 하나에서 모은 원본 입력
#[derive(Debug, Clone, Default)]
pub struct RawInput {
    path: HashMap<String, String>,
    // 같은 키가 여러 번 올 수 있으므로 받은 순서 그대로 보관
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        path: HashMap<String, String>,
        query: Vec<(String, String)>,
        body: Option<serde_json::Value>,
    ) -> Self {
        Self { path, query, body }
    }

    pub fn path(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path.insert(key.into(), value.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub(crate) fn view(&self) -> InputView<'_> {
        InputView {
            path: &self.path,
            query: &self.query,
            body: self.body.as_ref(),
        }
    }
}

/// 검증 중에 쓰는 빌린(borrowed) 입력. body 모델 안으로 들어가면 `body` 만 바뀝니다.
#[derive(Debug, Clone, Copy)]
pub(crate) struct InputView<'a> {
    pub(crate) path: &'a HashMap<String, String>,
    pub(crate) query: &'a [(String, String)],
    pub(crate) body: Option<&'a serde_json::Value>,
}

impl<'a> InputView<'a> {
    pub(crate) fn query_values(&self, key: &str) -> Vec<&'a str> {
        self.query
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub(crate) fn body_field(&self, key: &str) -> Option<&'a serde_json::Value> {
        self.body.and_then(|body| body.get(key))
    }

    pub(crate) fn with_body(self, body: &'a serde_json::Value) -> Self {
        Self {
            body: Some(body),
            ..self
        }
    }
}
