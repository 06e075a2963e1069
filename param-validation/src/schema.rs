//! 📐 스키마: 어떤 입력을, 어디서(path/query/body), 어떤 타입과 규칙으로 받을지 선언합니다.
//!
//! 스키마는 한 번 만들어지면 바뀌지 않습니다. 요청마다 새로 만드는 것은
//! 검증 결과뿐입니다.

use std::{collections::HashMap, fmt};

use regex::Regex;
use serde::Serialize;

use crate::{
    constraint::{anchored, Constraint},
    engine,
    error::{ErrorKind, SchemaError, ValidationErrors},
    input::RawInput,
    value::{Value, Values},
};

/// 입력값이 들어오는 위치
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Path,
    Query,
    Body,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Source::Path => "path",
            Source::Query => "query",
            Source::Body => "body",
        })
    }
}

/// 선언된 타입
#[derive(Debug, Clone)]
pub enum FieldType {
    Integer,
    Float,
    String,
    /// 미리 정해진 문자열 중 하나 (대소문자 구분)
    Enum(Vec<String>),
    /// 문자열 리스트. 쿼리에서는 같은 키가 여러 번 올 수 있습니다.
    List,
    /// 여러 필드를 하나로 묶은 "파라미터 모델"
    Model(Box<Schema>),
}

impl FieldType {
    pub fn choice<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldType::Enum(allowed.into_iter().map(Into::into).collect())
    }

    pub fn model(schema: Schema) -> Self {
        FieldType::Model(Box::new(schema))
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Float => "number",
            FieldType::String => "string",
            FieldType::Enum(_) => "enum",
            FieldType::List => "list",
            FieldType::Model(_) => "object",
        }
    }
}

/// 기본값. `Factory` 는 검증할 때마다 새로 호출됩니다.
///
/// 빈 리스트를 기본값으로 공유하면 호출 사이에 값이 쌓이는 문제가 생길 수 있어서
/// 리스트 기본값은 `default_with(|| Value::List(Vec::new()))` 처럼 팩토리로 선언합니다.
#[derive(Debug, Clone)]
pub enum DefaultValue {
    Value(Value),
    Factory(fn() -> Value),
}

impl DefaultValue {
    pub fn produce(&self) -> Value {
        match self {
            DefaultValue::Value(value) => value.clone(),
            DefaultValue::Factory(factory) => factory(),
        }
    }
}

/// 문서화용 메타데이터 (검증에는 쓰이지 않음)
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
}

/// ✨ 입력 하나의 선언
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    alias: Option<String>,
    source: Source,
    ty: FieldType,
    default: Option<DefaultValue>,
    constraints: Vec<Constraint>,
    embed: bool,
    metadata: Metadata,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, source: Source, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            alias: None,
            source,
            ty,
            default: None,
            constraints: Vec::new(),
            embed: false,
            metadata: Metadata::default(),
        }
    }

    pub fn path(name: impl Into<String>, ty: FieldType) -> Self {
        Self::new(name, Source::Path, ty)
    }

    pub fn query(name: impl Into<String>, ty: FieldType) -> Self {
        Self::new(name, Source::Query, ty)
    }

    pub fn body(name: impl Into<String>, ty: FieldType) -> Self {
        Self::new(name, Source::Body, ty)
    }

    /// 요청에서는 `alias` 로 찾고, 결과는 내부 이름으로 묶습니다.
    /// (`item-query` 처럼 Rust 식별자로 쓸 수 없는 이름에 사용)
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Value(value.into()));
        self
    }

    pub fn default_with(mut self, factory: fn() -> Value) -> Self {
        self.default = Some(DefaultValue::Factory(factory));
        self
    }

    /// 기본값 `null`. 명시적인 JSON `null` 도 허용합니다.
    pub fn optional(mut self) -> Self {
        self.default = Some(DefaultValue::Value(Value::Null));
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn ge(self, bound: f64) -> Self {
        self.constraint(Constraint::Ge(bound))
    }

    pub fn gt(self, bound: f64) -> Self {
        self.constraint(Constraint::Gt(bound))
    }

    pub fn le(self, bound: f64) -> Self {
        self.constraint(Constraint::Le(bound))
    }

    pub fn lt(self, bound: f64) -> Self {
        self.constraint(Constraint::Lt(bound))
    }

    pub fn min_length(self, len: usize) -> Self {
        self.constraint(Constraint::MinLength(len))
    }

    pub fn max_length(self, len: usize) -> Self {
        self.constraint(Constraint::MaxLength(len))
    }

    pub fn pattern(self, pattern: impl Into<String>) -> Self {
        self.constraint(Constraint::Pattern(pattern.into()))
    }

    pub fn allowed_values<I, S>(self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraint(Constraint::AllowedValues(
            allowed.into_iter().map(Into::into).collect(),
        ))
    }

    /// body 모델을 본문 전체가 아니라 `{ "<이름>": {...} }` 아래에서 읽습니다.
    pub fn embed(mut self) -> Self {
        self.embed = true;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.metadata.deprecated = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 요청에서 찾을 때 쓰는 이름
    pub fn external_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub fn is_optional(&self) -> bool {
        matches!(self.default, Some(DefaultValue::Value(Value::Null)))
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn is_embedded(&self) -> bool {
        self.embed
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// 이 필드가 직접 차지하는 입력 키.
    /// 쿼리 모델과 본문 전체를 받는 모델은 자기 이름의 키를 읽지 않습니다.
    pub(crate) fn own_key(&self) -> Option<&str> {
        match self.ty {
            FieldType::Model(_) if self.source != Source::Body || !self.embed => None,
            _ => Some(self.external_name()),
        }
    }
}

/// 🧱 필드 선언 묶음
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    forbid_extra: bool,
    // Pattern 원문 → 전체 매칭용으로 컴파일된 정규식
    patterns: HashMap<String, Regex>,
}

impl Schema {
    /// 스키마를 만들면서 선언 자체를 검사합니다.
    /// 기본값도 자기 필드의 제약 조건을 만족해야 합니다.
    pub fn new(fields: impl IntoIterator<Item = FieldSpec>) -> Result<Self, SchemaError> {
        let fields: Vec<FieldSpec> = fields.into_iter().collect();
        let mut patterns = HashMap::new();

        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|other| other.name == field.name) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
            if let Some(key) = field.own_key() {
                let taken = fields[..i]
                    .iter()
                    .any(|other| other.source == field.source && other.own_key() == Some(key));
                if taken {
                    return Err(SchemaError::DuplicateKey {
                        key: key.to_owned(),
                        location: field.source,
                    });
                }
            }

            let scalar = !matches!(field.ty, FieldType::List | FieldType::Model(_));
            if field.source == Source::Path && !scalar {
                return Err(SchemaError::UnsupportedSource {
                    field: field.name.clone(),
                    ty: field.ty.name(),
                    location: field.source,
                });
            }

            for constraint in &field.constraints {
                if !constraint.applies_to(&field.ty) {
                    return Err(SchemaError::InapplicableConstraint {
                        field: field.name.clone(),
                        constraint: constraint.name(),
                        ty: field.ty.name(),
                    });
                }
                if let Constraint::Pattern(pattern) = constraint {
                    let regex = anchored(pattern).map_err(|source| SchemaError::InvalidPattern {
                        field: field.name.clone(),
                        source,
                    })?;
                    patterns.insert(pattern.clone(), regex);
                }
            }
        }

        let schema = Self {
            fields,
            forbid_extra: false,
            patterns,
        };

        for field in &schema.fields {
            let Some(default) = &field.default else {
                continue;
            };
            let value = default.produce();
            if let Some(reason) = schema.check_default(field, &value) {
                return Err(SchemaError::InvalidDefault {
                    field: field.name.clone(),
                    reason,
                });
            }
        }

        Ok(schema)
    }

    /// 선언되지 않은 입력이 오면 `ExtraForbidden` 으로 실패시킵니다.
    pub fn forbid_extra(mut self) -> Self {
        self.forbid_extra = true;
        self
    }

    pub fn forbids_extra(&self) -> bool {
        self.forbid_extra
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// 이 스키마(쿼리/경로 모델 포함)가 해당 위치의 입력을 읽는지
    pub fn uses(&self, source: Source) -> bool {
        self.fields.iter().any(|field| match &field.ty {
            FieldType::Model(inner) if field.source != Source::Body => inner.uses(source),
            _ => field.source == source,
        })
    }

    pub fn validate(&self, input: &RawInput) -> Result<Values, ValidationErrors> {
        engine::validate(self, input)
    }

    /// 해당 위치의 키를 이 스키마(펼쳐 읽는 하위 모델 포함)가 읽는지
    pub(crate) fn claims(&self, source: Source, key: &str) -> bool {
        self.fields.iter().any(|field| match &field.ty {
            FieldType::Model(inner) if field.own_key().is_none() => {
                // 쿼리 모델은 쿼리 키를, 본문 전체 모델은 본문 키를 펼쳐 읽음
                let flattened = match field.source {
                    Source::Body => Source::Body,
                    _ => Source::Query,
                };
                flattened == source && inner.claims(source, key)
            }
            _ => field.source == source && field.external_name() == key,
        })
    }

    pub(crate) fn regex(&self, pattern: &str) -> Option<&Regex> {
        self.patterns.get(pattern)
    }

    fn check_default(&self, field: &FieldSpec, value: &Value) -> Option<ErrorKind> {
        if value.is_null() {
            return None;
        }
        let type_matches = match (&field.ty, value) {
            (FieldType::Integer, Value::Int(_))
            | (FieldType::Float, Value::Float(_) | Value::Int(_))
            | (FieldType::String | FieldType::Enum(_), Value::Str(_))
            | (FieldType::List, Value::List(_))
            | (FieldType::Model(_), Value::Model(_)) => true,
            _ => false,
        };
        if !type_matches {
            return Some(ErrorKind::TypeCoercion {
                expected: field.ty.name(),
            });
        }
        if let (FieldType::Enum(allowed), Value::Str(s)) = (&field.ty, value) {
            if !allowed.contains(s) {
                return Some(ErrorKind::InvalidChoice {
                    allowed: allowed.clone(),
                });
            }
        }
        engine::violations(self, field, value)
            .into_iter()
            .next()
            .map(|constraint| ErrorKind::ConstraintViolation { constraint })
    }
}
