//! 🧠 핵심 로직: 스키마를 따라 원본 입력을 확인 → 변환 → 제약 조건 검사
//!
//! 필드 하나가 실패해도 멈추지 않고 끝까지 검사해서, 실패한 내용을 한 번에 모두 돌려줍니다.

use crate::{
    constraint::Constraint,
    error::{ErrorKind, FieldError, ValidationErrors},
    input::{InputView, RawInput},
    schema::{FieldSpec, FieldType, Schema, Source},
    value::{Value, Values},
};

/// 원본 입력을 스키마대로 검증하고 변환합니다.
///
/// 성공하면 필드마다 값 하나(생략된 필드는 기본값)를 내부 이름으로 묶어 돌려주고,
/// 실패하면 기록된 실패를 전부 돌려줍니다.
pub fn validate(schema: &Schema, input: &RawInput) -> Result<Values, ValidationErrors> {
    let mut errors = Vec::new();
    let values = validate_schema(schema, input.view(), &[], &mut errors);

    if errors.is_empty() {
        Ok(values)
    } else {
        tracing::debug!(failures = errors.len(), "input rejected");
        Err(ValidationErrors::new(errors))
    }
}

fn validate_schema(
    schema: &Schema,
    view: InputView<'_>,
    prefix: &[String],
    errors: &mut Vec<FieldError>,
) -> Values {
    let mut values = Values::default();

    for field in schema.fields() {
        let path = child_path(prefix, field.external_name());

        let value = match field.ty() {
            FieldType::Model(inner) => validate_model(field, inner, view, path, errors),
            _ => validate_field(schema, field, view, path, errors),
        };
        if let Some(value) = value {
            values.push(field.name(), value);
        }
    }

    if schema.forbids_extra() {
        check_extra(schema, view, prefix, errors);
    }

    values
}

fn validate_field(
    schema: &Schema,
    field: &FieldSpec,
    view: InputView<'_>,
    path: Vec<String>,
    errors: &mut Vec<FieldError>,
) -> Option<Value> {
    let Some(raw) = lookup(field, view) else {
        return missing(field, path, errors);
    };

    if field.metadata().deprecated {
        tracing::warn!(field = field.external_name(), "deprecated parameter used");
    }

    let input = raw.to_json();
    if input.is_null() && field.is_optional() {
        return Some(Value::Null);
    }

    let value = match coerce(field.ty(), &raw) {
        Ok(value) => value,
        Err(kind) => {
            errors.push(FieldError::new(field.source(), path, kind, Some(input)));
            return None;
        }
    };

    let violations = violations(schema, field, &value);
    if violations.is_empty() {
        return Some(value);
    }
    for constraint in violations {
        errors.push(FieldError::new(
            field.source(),
            path.clone(),
            ErrorKind::ConstraintViolation { constraint },
            Some(input.clone()),
        ));
    }
    None
}

fn validate_model(
    field: &FieldSpec,
    inner: &Schema,
    view: InputView<'_>,
    path: Vec<String>,
    errors: &mut Vec<FieldError>,
) -> Option<Value> {
    if field.source() != Source::Body {
        // 쿼리 모델: 같은 쿼리 문자열에서 하위 필드를 찾습니다.
        return Some(Value::Model(validate_schema(inner, view, &path, errors)));
    }

    let body = if field.is_embedded() {
        view.body_field(field.external_name())
    } else {
        view.body
    };

    match body {
        None => missing(field, path, errors),
        Some(serde_json::Value::Null) if field.is_optional() => Some(Value::Null),
        Some(object @ serde_json::Value::Object(_)) => Some(Value::Model(validate_schema(
            inner,
            view.with_body(object),
            &path,
            errors,
        ))),
        Some(other) => {
            errors.push(FieldError::new(
                Source::Body,
                path,
                ErrorKind::TypeCoercion {
                    expected: field.ty().name(),
                },
                Some(other.clone()),
            ));
            None
        }
    }
}

/// 값이 없을 때: 기본값이 있으면 기본값(팩토리는 매번 새로 호출), 없으면 `MissingField`
fn missing(field: &FieldSpec, path: Vec<String>, errors: &mut Vec<FieldError>) -> Option<Value> {
    match field.default_value() {
        Some(default) => Some(match (field.ty(), default.produce()) {
            // 실수 필드의 정수 기본값은 실수로 맞춤
            (FieldType::Float, Value::Int(n)) => Value::Float(n as f64),
            (_, value) => value,
        }),
        None => {
            errors.push(FieldError::new(
                field.source(),
                path,
                ErrorKind::MissingField,
                None,
            ));
            None
        }
    }
}

/// 위반한 제약 조건 목록 (하나의 필드가 여러 개를 위반할 수 있음)
pub(crate) fn violations(schema: &Schema, field: &FieldSpec, value: &Value) -> Vec<Constraint> {
    field
        .constraints()
        .iter()
        .filter(|constraint| !satisfies(schema, constraint, value))
        .cloned()
        .collect()
}

fn satisfies(schema: &Schema, constraint: &Constraint, value: &Value) -> bool {
    let regex = match constraint {
        Constraint::Pattern(pattern) => schema.regex(pattern),
        _ => None,
    };
    match value {
        Value::Int(n) => constraint.check_number(*n as f64),
        Value::Float(n) => constraint.check_number(*n),
        Value::Str(s) => constraint.check_str(s, regex),
        Value::List(items) => match constraint {
            Constraint::MinLength(_) | Constraint::MaxLength(_) => {
                constraint.check_len(items.len())
            }
            _ => items.iter().all(|item| constraint.check_str(item, regex)),
        },
        Value::Null | Value::Model(_) => true,
    }
}

fn check_extra(
    schema: &Schema,
    view: InputView<'_>,
    prefix: &[String],
    errors: &mut Vec<FieldError>,
) {
    let reads = |source: Source| schema.fields().iter().any(|field| field.source() == source);

    if reads(Source::Query) {
        for (key, value) in view.query {
            if !schema.claims(Source::Query, key.as_str()) {
                errors.push(FieldError::new(
                    Source::Query,
                    child_path(prefix, key),
                    ErrorKind::ExtraForbidden,
                    Some(value.as_str().into()),
                ));
            }
        }
    }

    if reads(Source::Body) {
        if let Some(serde_json::Value::Object(object)) = view.body {
            for (key, value) in object {
                if !schema.claims(Source::Body, key.as_str()) {
                    errors.push(FieldError::new(
                        Source::Body,
                        child_path(prefix, key),
                        ErrorKind::ExtraForbidden,
                        Some(value.clone()),
                    ));
                }
            }
        }
    }
}

fn child_path(prefix: &[String], name: &str) -> Vec<String> {
    let mut path = prefix.to_vec();
    path.push(name.to_owned());
    path
}

/// 요청에서 찾은 원래 표현
#[derive(Debug)]
enum Raw<'a> {
    Text(&'a str),
    Many(Vec<&'a str>),
    Json(&'a serde_json::Value),
}

impl Raw<'_> {
    /// 에러에 그대로 담아 돌려줄 입력값
    fn to_json(&self) -> serde_json::Value {
        match self {
            Raw::Text(s) => (*s).into(),
            Raw::Many(items) => items.clone().into(),
            Raw::Json(value) => (*value).clone(),
        }
    }
}

fn lookup<'a>(field: &FieldSpec, view: InputView<'a>) -> Option<Raw<'a>> {
    let key = field.external_name();
    match field.source() {
        Source::Path => view.path.get(key).map(|v| Raw::Text(v.as_str())),
        Source::Query => {
            let values = view.query_values(key);
            match field.ty() {
                // q=foo&q=bar → ["foo", "bar"]
                FieldType::List if !values.is_empty() => Some(Raw::Many(values)),
                // 단일 값 필드에 같은 키가 여러 번 오면 마지막 값을 씁니다.
                _ => values.last().copied().map(Raw::Text),
            }
        }
        Source::Body => view.body_field(key).map(Raw::Json),
    }
}

fn coerce(ty: &FieldType, raw: &Raw<'_>) -> Result<Value, ErrorKind> {
    let type_error = || ErrorKind::TypeCoercion {
        expected: ty.name(),
    };

    match ty {
        FieldType::Integer => match raw {
            Raw::Text(s) => s.parse().map(Value::Int).map_err(|_| type_error()),
            Raw::Json(serde_json::Value::String(s)) => {
                s.parse().map(Value::Int).map_err(|_| type_error())
            }
            Raw::Json(serde_json::Value::Number(n)) => n
                .as_i64()
                .or_else(|| {
                    // 5.0 은 정수로 받되 5.5 는 거부
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                        .map(|f| f as i64)
                })
                .map(Value::Int)
                .ok_or_else(type_error),
            _ => Err(type_error()),
        },
        FieldType::Float => {
            let parsed = match raw {
                Raw::Text(s) => s.parse::<f64>().ok(),
                Raw::Json(serde_json::Value::String(s)) => s.parse::<f64>().ok(),
                Raw::Json(serde_json::Value::Number(n)) => n.as_f64(),
                _ => None,
            };
            parsed
                .filter(|f| f.is_finite())
                .map(Value::Float)
                .ok_or_else(type_error)
        }
        FieldType::String => text(raw).map(Value::from).ok_or_else(type_error),
        FieldType::Enum(allowed) => match text(raw) {
            Some(s) if allowed.iter().any(|v| v == s) => Ok(Value::from(s)),
            _ => Err(ErrorKind::InvalidChoice {
                allowed: allowed.clone(),
            }),
        },
        FieldType::List => match raw {
            Raw::Many(items) => Ok(Value::List(items.iter().map(|s| s.to_string()).collect())),
            Raw::Text(s) => Ok(Value::List(vec![s.to_string()])),
            Raw::Json(serde_json::Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map(str::to_owned))
                .collect::<Option<Vec<_>>>()
                .map(Value::List)
                .ok_or_else(type_error),
            Raw::Json(_) => Err(type_error()),
        },
        // 모델은 validate_model 에서 처리
        FieldType::Model(_) => Err(type_error()),
    }
}

fn text<'a>(raw: &Raw<'a>) -> Option<&'a str> {
    match *raw {
        Raw::Text(s) => Some(s),
        Raw::Json(serde_json::Value::String(s)) => Some(s.as_str()),
        _ => None,
    }
}
