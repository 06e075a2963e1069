//! 필드 하나에 붙는 검증 규칙(제약 조건).
//!
//! `ge=1`, `max_length=50`, `pattern=...` 같은 선언형 규칙을 명시적인 값 목록으로 표현합니다.
//! 필드 하나에 여러 제약 조건이 붙을 수 있습니다.

use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::schema::FieldType;

/// 🧩 제약 조건 하나
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// 이상 (inclusive lower bound)
    Ge(f64),
    /// 초과 (exclusive lower bound)
    Gt(f64),
    /// 이하 (inclusive upper bound)
    Le(f64),
    /// 미만 (exclusive upper bound)
    Lt(f64),
    /// 문자열이면 글자 수, 리스트면 항목 수
    MinLength(usize),
    MaxLength(usize),
    /// 정규식. 부분 검색이 아니라 문자열 전체가 맞아야 합니다.
    Pattern(String),
    AllowedValues(Vec<String>),
}

impl Constraint {
    /// 에러 응답의 `ctx` 키로 쓰이는 이름
    pub fn name(&self) -> &'static str {
        match self {
            Constraint::Ge(_) => "ge",
            Constraint::Gt(_) => "gt",
            Constraint::Le(_) => "le",
            Constraint::Lt(_) => "lt",
            Constraint::MinLength(_) => "min_length",
            Constraint::MaxLength(_) => "max_length",
            Constraint::Pattern(_) => "pattern",
            Constraint::AllowedValues(_) => "allowed_values",
        }
    }

    /// 이 제약 조건을 해당 타입의 필드에 붙일 수 있는지
    pub(crate) fn applies_to(&self, ty: &FieldType) -> bool {
        match self {
            Constraint::Ge(_) | Constraint::Gt(_) | Constraint::Le(_) | Constraint::Lt(_) => {
                matches!(ty, FieldType::Integer | FieldType::Float)
            }
            Constraint::MinLength(_) | Constraint::MaxLength(_) => {
                matches!(ty, FieldType::String | FieldType::List)
            }
            Constraint::Pattern(_) | Constraint::AllowedValues(_) => {
                matches!(ty, FieldType::String | FieldType::Enum(_) | FieldType::List)
            }
        }
    }

    pub(crate) fn check_number(&self, n: f64) -> bool {
        match *self {
            Constraint::Ge(bound) => n >= bound,
            Constraint::Gt(bound) => n > bound,
            Constraint::Le(bound) => n <= bound,
            Constraint::Lt(bound) => n < bound,
            _ => true,
        }
    }

    pub(crate) fn check_len(&self, len: usize) -> bool {
        match *self {
            Constraint::MinLength(min) => len >= min,
            Constraint::MaxLength(max) => len <= max,
            _ => true,
        }
    }

    /// `regex` 는 `Pattern` 일 때 스키마가 미리 컴파일해 둔 정규식
    pub(crate) fn check_str(&self, s: &str, regex: Option<&Regex>) -> bool {
        match self {
            Constraint::MinLength(_) | Constraint::MaxLength(_) => {
                self.check_len(s.chars().count())
            }
            Constraint::Pattern(_) => regex.is_some_and(|re| re.is_match(s)),
            Constraint::AllowedValues(allowed) => allowed.iter().any(|v| v == s),
            _ => true,
        }
    }
}

// "input should {constraint}" 형태로 읽히도록 작성
impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Ge(n) => write!(f, "be greater than or equal to {n}"),
            Constraint::Gt(n) => write!(f, "be greater than {n}"),
            Constraint::Le(n) => write!(f, "be less than or equal to {n}"),
            Constraint::Lt(n) => write!(f, "be less than {n}"),
            Constraint::MinLength(n) => write!(f, "have a length of at least {n}"),
            Constraint::MaxLength(n) => write!(f, "have a length of at most {n}"),
            Constraint::Pattern(p) => write!(f, "match pattern '{p}'"),
            Constraint::AllowedValues(allowed) => write!(f, "be {}", choices(allowed)),
        }
    }
}

/// `'a', 'b' or 'c'`
pub(crate) fn choices(allowed: &[String]) -> String {
    match allowed {
        [] => String::new(),
        [only] => format!("'{only}'"),
        [init @ .., last] => {
            let init = init
                .iter()
                .map(|v| format!("'{v}'"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{init} or '{last}'")
        }
    }
}

/// 정규식을 문자열 전체 매칭으로 고정
pub(crate) fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}
