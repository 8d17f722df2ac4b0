/// Tests for building allow-lists from names and serialized configuration.
use noexc::{CollectStringPrint, ExcKind, ExcType, Exception, ExceptionGuard, InvalidKindError};
use pretty_assertions::assert_eq;

#[test]
fn from_names_resolves_builtin_and_custom_kinds() {
    let guard = ExceptionGuard::from_names(["ArithmeticError", "KeyError", "AppError"]).unwrap();
    assert_eq!(
        guard.ignored_kinds(),
        &[
            ExcKind::Builtin(ExcType::ArithmeticError),
            ExcKind::Builtin(ExcType::KeyError),
            ExcKind::Custom("AppError".to_owned()),
        ]
    );
    assert_eq!(
        guard,
        ExceptionGuard::new([
            ExcType::ArithmeticError.into(),
            ExcType::KeyError.into(),
            ExcKind::Custom("AppError".to_owned()),
        ])
    );
}

#[test]
fn from_names_reports_first_invalid_entry() {
    let err = ExceptionGuard::from_names(["KeyError", "not a class", ""]).unwrap_err();
    assert_eq!(err, InvalidKindError::NotIdentifier("not a class".to_owned()));
    assert_eq!(err.to_string(), "'not a class' is not a valid exception class name");
}

#[test]
fn from_names_accepts_empty_list() {
    let guard = ExceptionGuard::from_names(Vec::<String>::new()).unwrap();
    assert!(guard.ignored_kinds().is_empty());
}

#[test]
fn deserialize_guard_from_json() {
    let guard: ExceptionGuard =
        serde_json::from_str(r#"{"ignored_kinds": ["LookupError", "RetryableError"]}"#).unwrap();

    let mut print = CollectStringPrint::new();
    let outcome: Result<Option<()>, Exception> = guard.run(&mut print, || Err(Exception::list_index_error()));
    assert_eq!(outcome, Ok(None));

    let retry = Exception::custom("RetryableError", ExcType::RuntimeError, "later");
    let outcome: Result<Option<()>, Exception> = guard.run(&mut print, || Err(retry));
    assert_eq!(outcome, Ok(None));

    assert_eq!(
        print.output(),
        "Ignoring exception list index out of range\nIgnoring exception later\n"
    );
}

#[test]
fn deserialize_rejects_invalid_kind_name() {
    let result: Result<ExceptionGuard, _> = serde_json::from_str(r#"{"ignored_kinds": ["Key Error"]}"#);
    let err = result.unwrap_err();
    assert!(err.to_string().contains("'Key Error' is not a valid exception class name"), "{err}");
}

#[test]
fn serialize_guard_uses_bare_names() {
    let guard = ExceptionGuard::new([
        ExcKind::Builtin(ExcType::ZeroDivisionError),
        ExcKind::Custom("AppError".to_owned()),
    ]);
    let json = serde_json::to_string(&guard).unwrap();
    assert_eq!(json, r#"{"ignored_kinds":["ZeroDivisionError","AppError"]}"#);

    let back: ExceptionGuard = serde_json::from_str(&json).unwrap();
    assert_eq!(back, guard);
}

#[test]
fn exception_serializes_with_metadata() {
    let exc = Exception::custom("AppError", ExcType::ValueError, "bad input");
    let json = serde_json::to_value(&exc).unwrap();
    assert_eq!(json["exc_type"], "ValueError");
    assert_eq!(json["custom_class_name"], "AppError");

    let back: Exception = serde_json::from_value(json).unwrap();
    assert_eq!(back, exc);
}
