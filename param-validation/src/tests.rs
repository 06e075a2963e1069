//! 검증 엔진 시나리오 테스트

use serde_json::json;

use super::*;

fn item_schema() -> Schema {
    Schema::new([FieldSpec::path("item_id", FieldType::Integer).ge(1.0).le(1000.0)]).unwrap()
}

fn kinds(errors: &ValidationErrors) -> Vec<(String, &ErrorKind)> {
    errors
        .errors()
        .iter()
        .map(|e| (e.field(), &e.kind))
        .collect()
}

/// ✅ "5" → 5
#[test]
fn coerces_numeric_strings() {
    let values = item_schema()
        .validate(&RawInput::new().path("item_id", "5"))
        .unwrap();
    assert_eq!(values.int("item_id"), Some(5));
}

/// ✅ ge=1, le=1000 경계값
#[test]
fn inclusive_bounds_accept_edges_and_reject_outside() {
    let schema = item_schema();
    let check = |raw: &str| schema.validate(&RawInput::new().path("item_id", raw));

    assert!(check("1").is_ok());
    assert!(check("1000").is_ok());

    let errors = check("0").unwrap_err();
    assert_eq!(
        kinds(&errors),
        [(
            "item_id".to_owned(),
            &ErrorKind::ConstraintViolation {
                constraint: Constraint::Ge(1.0)
            }
        )]
    );

    let errors = check("1001").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.errors()[0].kind,
        ErrorKind::ConstraintViolation {
            constraint: Constraint::Le(1000.0)
        }
    );
    assert_eq!(errors.errors()[0].input, Some(json!("1001")));
}

#[test]
fn exclusive_bounds_on_floats() {
    let schema =
        Schema::new([FieldSpec::query("size", FieldType::Float).gt(0.0).lt(10.5)]).unwrap();
    let check = |raw: &str| schema.validate(&RawInput::new().query("size", raw));

    assert_eq!(check("10.4").unwrap().float("size"), Some(10.4));
    assert!(check("0").is_err());
    assert!(check("10.5").is_err());
    // 무한대/NaN 은 숫자로 보지 않음
    assert!(matches!(
        check("inf").unwrap_err().errors()[0].kind,
        ErrorKind::TypeCoercion { expected: "number" }
    ));
}

/// ✅ min_length=3, max_length=50, pattern=^fixedquery$
#[test]
fn pattern_is_checked_even_when_length_fits() {
    let schema = Schema::new([FieldSpec::query("q", FieldType::String)
        .optional()
        .min_length(3)
        .max_length(50)
        .pattern("^fixedquery$")])
    .unwrap();

    let values = schema
        .validate(&RawInput::new().query("q", "fixedquery"))
        .unwrap();
    assert_eq!(values.str("q"), Some("fixedquery"));

    let errors = schema
        .validate(&RawInput::new().query("q", "fixedquer"))
        .unwrap_err();
    assert_eq!(
        kinds(&errors),
        [(
            "q".to_owned(),
            &ErrorKind::ConstraintViolation {
                constraint: Constraint::Pattern("^fixedquery$".into())
            }
        )]
    );

    // q 가 없으면 기본값 null
    let values = schema.validate(&RawInput::new()).unwrap();
    assert_eq!(values.get("q"), Some(&Value::Null));
}

#[test]
fn one_field_can_violate_several_constraints() {
    let schema = Schema::new([FieldSpec::query("q", FieldType::String)
        .min_length(3)
        .pattern("^fixedquery$")])
    .unwrap();

    let errors = schema
        .validate(&RawInput::new().query("q", "ab"))
        .unwrap_err();
    assert_eq!(errors.len(), 2);
}

/// ✅ 사전 정의 값 (Enum)
#[test]
fn enum_accepts_only_listed_literals() {
    let schema = Schema::new([FieldSpec::path(
        "model_name",
        FieldType::choice(["alexnet", "resnet", "lenet"]),
    )])
    .unwrap();

    let values = schema
        .validate(&RawInput::new().path("model_name", "alexnet"))
        .unwrap();
    assert_eq!(values.str("model_name"), Some("alexnet"));

    let errors = schema
        .validate(&RawInput::new().path("model_name", "vgg"))
        .unwrap_err();
    assert_eq!(
        errors.errors()[0].kind,
        ErrorKind::InvalidChoice {
            allowed: vec!["alexnet".into(), "resnet".into(), "lenet".into()]
        }
    );

    // 대소문자 구분
    assert!(schema
        .validate(&RawInput::new().path("model_name", "AlexNet"))
        .is_err());
}

/// ✅ q=foo&q=bar → ["foo", "bar"]
#[test]
fn repeated_query_keys_become_an_ordered_list() {
    let schema = Schema::new([FieldSpec::query("q", FieldType::List)
        .default_with(|| Value::List(Vec::new()))])
    .unwrap();

    let values = schema
        .validate(&RawInput::new().query("q", "foo").query("q", "bar"))
        .unwrap();
    assert_eq!(values.list("q"), Some(&["foo".to_owned(), "bar".to_owned()][..]));

    let values = schema.validate(&RawInput::new().query("q", "solo")).unwrap();
    assert_eq!(values.list("q"), Some(&["solo".to_owned()][..]));
}

/// ✅ 기본값 리스트는 호출마다 새 값 (공유되는 mutable 기본값 문제 없음)
#[test]
fn list_defaults_are_fresh_on_every_call() {
    let schema = Schema::new([FieldSpec::query("tags", FieldType::List)
        .default_with(|| Value::List(Vec::new()))])
    .unwrap();
    let input = RawInput::new();

    let first = schema.validate(&input).unwrap();
    let mut first = match first.get("tags").cloned() {
        Some(Value::List(items)) => items,
        other => panic!("unexpected {other:?}"),
    };
    first.push("leaked".into());

    let second = schema.validate(&input).unwrap();
    assert_eq!(second.list("tags"), Some(&[][..]));
}

/// ✅ 같은 입력이면 같은 결과
#[test]
fn validation_is_idempotent() {
    let schema = Schema::new([
        FieldSpec::path("item_id", FieldType::Integer).ge(1.0),
        FieldSpec::query("q", FieldType::String).min_length(3),
        FieldSpec::query("tags", FieldType::List).default_with(|| Value::List(Vec::new())),
    ])
    .unwrap();

    let good = RawInput::new().path("item_id", "3").query("q", "abc");
    assert_eq!(schema.validate(&good), schema.validate(&good));

    let bad = RawInput::new().path("item_id", "x");
    assert_eq!(schema.validate(&bad), schema.validate(&bad));
}

/// ✅ 첫 실패에서 멈추지 않고 모두 모음
#[test]
fn every_failure_is_reported_in_declaration_order() {
    let schema = Schema::new([
        FieldSpec::path("item_id", FieldType::Integer),
        FieldSpec::query("needy", FieldType::String),
        FieldSpec::query("size", FieldType::Float).gt(0.0),
    ])
    .unwrap();

    let errors = schema
        .validate(&RawInput::new().path("item_id", "foo").query("size", "-1"))
        .unwrap_err();

    let summary: Vec<_> = errors
        .errors()
        .iter()
        .map(|e| (e.loc().join("."), e.kind.code()))
        .collect();
    assert_eq!(
        summary,
        [
            ("path.item_id".to_owned(), "type_error"),
            ("query.needy".to_owned(), "missing"),
            ("query.size".to_owned(), "constraint_violation"),
        ]
    );
    assert_eq!(errors.errors()[1].input, None);
}

/// ✅ alias 로 찾고, 내부 이름으로 묶음
#[test]
fn alias_is_used_for_lookup_only() {
    let schema = Schema::new([FieldSpec::query("q", FieldType::String)
        .alias("item-query")
        .optional()])
    .unwrap();

    let values = schema
        .validate(&RawInput::new().query("item-query", "hello"))
        .unwrap();
    assert_eq!(values.str("q"), Some("hello"));
    assert_eq!(values.get("item-query"), None);

    // 내부 이름으로 보내면 모르는 키
    let values = schema.validate(&RawInput::new().query("q", "hello")).unwrap();
    assert_eq!(values.get("q"), Some(&Value::Null));
}

fn filter_schema() -> Schema {
    Schema::new([
        FieldSpec::query("limit", FieldType::Integer)
            .default(100)
            .gt(0.0)
            .le(100.0),
        FieldSpec::query("offset", FieldType::Integer).default(0).ge(0.0),
        FieldSpec::query("order_by", FieldType::choice(["created_at", "updated_at"]))
            .default("created_at"),
        FieldSpec::query("tags", FieldType::List).default_with(|| Value::List(Vec::new())),
    ])
    .unwrap()
}

/// ✅ 쿼리 파라미터 모델
#[test]
fn query_models_collect_flat_query_params() {
    let schema =
        Schema::new([FieldSpec::query("filter", FieldType::model(filter_schema()))]).unwrap();

    let input = RawInput::new()
        .query("limit", "10")
        .query("tags", "hi")
        .query("tags", "hello")
        .query("tags", "nihao");
    let values = schema.validate(&input).unwrap();

    assert_eq!(
        values.to_json(),
        json!({
            "filter": {
                "limit": 10,
                "offset": 0,
                "order_by": "created_at",
                "tags": ["hi", "hello", "nihao"]
            }
        })
    );
}

#[test]
fn nested_failures_carry_the_parent_prefix() {
    let schema =
        Schema::new([FieldSpec::query("filter", FieldType::model(filter_schema()))]).unwrap();

    let errors = schema
        .validate(&RawInput::new().query("limit", "0").query("order_by", "name"))
        .unwrap_err();

    let fields: Vec<_> = errors.errors().iter().map(FieldError::field).collect();
    assert_eq!(fields, ["filter.limit", "filter.order_by"]);
}

#[test]
fn forbidding_extra_query_params() {
    let schema = Schema::new([FieldSpec::query(
        "filter",
        FieldType::model(filter_schema().forbid_extra()),
    )])
    .unwrap();

    let errors = schema
        .validate(&RawInput::new().query("limit", "5").query("tool", "plumbus"))
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors()[0].field(), "filter.tool");
    assert_eq!(errors.errors()[0].kind, ErrorKind::ExtraForbidden);
    assert_eq!(errors.errors()[0].input, Some(json!("plumbus")));
}

#[test]
fn forbidding_extra_at_the_top_still_accepts_model_keys() {
    let schema = Schema::new([
        FieldSpec::query("filter", FieldType::model(filter_schema())),
        FieldSpec::query("q", FieldType::String).optional(),
    ])
    .unwrap()
    .forbid_extra();

    let values = schema
        .validate(&RawInput::new().query("limit", "5").query("q", "hi"))
        .unwrap();
    assert_eq!(values.model("filter").and_then(|f| f.int("limit")), Some(5));

    // 어느 모델도 읽지 않는 키만 거부
    let errors = schema
        .validate(&RawInput::new().query("limit", "5").query("tool", "plumbus"))
        .unwrap_err();
    let fields: Vec<_> = errors.errors().iter().map(FieldError::field).collect();
    assert_eq!(fields, ["tool"]);
}

#[test]
fn forbidding_extra_at_the_top_accepts_whole_body_model_keys() {
    let schema = item_body_schema().forbid_extra();

    schema
        .validate(&RawInput::new().body(json!({ "name": "Foo", "price": 1.5 })))
        .unwrap();

    let errors = schema
        .validate(&RawInput::new().body(json!({ "name": "Foo", "price": 1.5, "color": "red" })))
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors()[0].field(), "color");
    assert_eq!(errors.errors()[0].kind, ErrorKind::ExtraForbidden);
}

#[test]
fn integer_default_on_a_float_field_is_a_float() {
    let schema = Schema::new([FieldSpec::query("size", FieldType::Float).default(1)]).unwrap();

    let values = schema.validate(&RawInput::new()).unwrap();
    assert_eq!(values.float("size"), Some(1.0));
    assert_eq!(values.get("size"), Some(&Value::Float(1.0)));
}

fn item_body_schema() -> Schema {
    let item = Schema::new([
        FieldSpec::body("name", FieldType::String),
        FieldSpec::body("description", FieldType::String).optional(),
        FieldSpec::body("price", FieldType::Float),
        FieldSpec::body("tax", FieldType::Float).optional(),
    ])
    .unwrap();
    Schema::new([FieldSpec::body("item", FieldType::model(item))]).unwrap()
}

/// ✅ 요청 본문 모델
#[test]
fn body_models_read_the_whole_json_body() {
    let input = RawInput::new().body(json!({ "name": "Foo", "price": "35.4", "tax": null }));
    let values = item_body_schema().validate(&input).unwrap();

    assert_eq!(
        values.to_json(),
        json!({
            "item": { "name": "Foo", "description": null, "price": 35.4, "tax": null }
        })
    );
}

#[test]
fn body_model_errors() {
    let schema = item_body_schema();

    let errors = schema
        .validate(&RawInput::new().body(json!({ "price": "cheap", "name": 3 })))
        .unwrap_err();
    let summary: Vec<_> = errors
        .errors()
        .iter()
        .map(|e| (e.loc().join("."), e.kind.code()))
        .collect();
    assert_eq!(
        summary,
        [
            ("body.item.name".to_owned(), "type_error"),
            ("body.item.price".to_owned(), "type_error"),
        ]
    );

    let errors = schema.validate(&RawInput::new()).unwrap_err();
    assert_eq!(errors.errors()[0].kind, ErrorKind::MissingField);

    let errors = schema.validate(&RawInput::new().body(json!([1, 2]))).unwrap_err();
    assert_eq!(
        errors.errors()[0].kind,
        ErrorKind::TypeCoercion { expected: "object" }
    );
}

#[test]
fn embedded_body_models_read_their_own_key() {
    let user = Schema::new([FieldSpec::body("username", FieldType::String).min_length(1)])
        .unwrap()
        .forbid_extra();
    let schema = Schema::new([
        FieldSpec::body("user", FieldType::model(user)).embed(),
        FieldSpec::body("importance", FieldType::Integer).gt(0.0),
    ])
    .unwrap();

    let values = schema
        .validate(&RawInput::new().body(json!({
            "user": { "username": "dave" },
            "importance": 5.0
        })))
        .unwrap();
    assert_eq!(values.model("user").and_then(|u| u.str("username")), Some("dave"));
    assert_eq!(values.int("importance"), Some(5));

    let errors = schema
        .validate(&RawInput::new().body(json!({
            "user": { "username": "dave", "admin": true },
            "importance": 5.5
        })))
        .unwrap_err();
    let fields: Vec<_> = errors.errors().iter().map(FieldError::field).collect();
    assert_eq!(fields, ["user.admin", "importance"]);
}

#[test]
fn json_lists_must_hold_strings() {
    let schema = Schema::new([FieldSpec::body("tags", FieldType::List).max_length(2)]).unwrap();

    let values = schema
        .validate(&RawInput::new().body(json!({ "tags": ["a", "b"] })))
        .unwrap();
    assert_eq!(values.list("tags"), Some(&["a".to_owned(), "b".to_owned()][..]));

    assert!(schema
        .validate(&RawInput::new().body(json!({ "tags": ["a", 1] })))
        .is_err());

    let errors = schema
        .validate(&RawInput::new().body(json!({ "tags": ["a", "b", "c"] })))
        .unwrap_err();
    assert_eq!(
        errors.errors()[0].kind,
        ErrorKind::ConstraintViolation {
            constraint: Constraint::MaxLength(2)
        }
    );
}

#[test]
fn allowed_values_apply_to_each_list_item() {
    let schema = Schema::new([FieldSpec::query("order", FieldType::List)
        .allowed_values(["asc", "desc"])
        .default_with(|| Value::List(Vec::new()))])
    .unwrap();

    assert!(schema
        .validate(&RawInput::new().query("order", "asc").query("order", "desc"))
        .is_ok());
    assert!(schema
        .validate(&RawInput::new().query("order", "asc").query("order", "up"))
        .is_err());
}

#[test]
fn last_value_wins_for_scalar_query_params() {
    let schema = Schema::new([FieldSpec::query("limit", FieldType::Integer)]).unwrap();
    let values = schema
        .validate(&RawInput::new().query("limit", "1").query("limit", "2"))
        .unwrap();
    assert_eq!(values.int("limit"), Some(2));
}

#[test]
fn free_function_matches_method() {
    let schema = item_schema();
    let input = RawInput::new().path("item_id", "42");
    assert_eq!(validate(&schema, &input), schema.validate(&input));
}
