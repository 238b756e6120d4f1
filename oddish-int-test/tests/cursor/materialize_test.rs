use bson::{doc, Document};
use oddish::collection::FindOptions;
use oddish::cursor::{materialize, materialize_strict, DecodeStep, SafeCursor};
use oddish::errors::{ErrorKind, OddishError};
use oddish::store::memory::InMemoryCursor;
use oddish_int_test::test_util::{
    cleanup, create_strict_test_context, create_test_context, insert_test_employees, run_test,
    Employee,
};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
struct Reading {
    sensor: String,
    value: f64,
}

fn readings(count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| doc! { "sensor": format!("s{}", i), "value": (i as f64) * 0.5 })
        .collect()
}

fn cursor_over(documents: Vec<Document>) -> SafeCursor {
    SafeCursor::from_cursor(InMemoryCursor::new(documents))
}

#[test]
fn test_length_matches_result_count_for_any_starting_length() {
    for existing in [0usize, 1, 3, 7, 12] {
        for results in [0usize, 1, 3, 7, 12] {
            let mut destination = vec![
                Reading {
                    sensor: "stale".into(),
                    value: -1.0,
                };
                existing
            ];
            let count = materialize(cursor_over(readings(results)), &mut destination).unwrap();

            assert_eq!(count, results);
            assert_eq!(destination.len(), results);
            assert!(destination.iter().all(|r| r.sensor != "stale"));
        }
    }
}

#[test]
fn test_two_fresh_cursors_give_the_same_result() {
    let mut first: Vec<Reading> = Vec::new();
    let mut second = vec![Reading::default(); 9];
    materialize(cursor_over(readings(5)), &mut first).unwrap();
    materialize(cursor_over(readings(5)), &mut second).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_malformed_document_looks_like_exhaustion() {
    let mut documents = readings(5);
    documents[2] = doc! { "sensor": "s2", "value": "high" };

    let mut with_bad: Vec<Reading> = Vec::new();
    let mut clean: Vec<Reading> = Vec::new();
    let bad_count = materialize(cursor_over(documents.clone()), &mut with_bad).unwrap();
    let clean_count = materialize(cursor_over(readings(2)), &mut clean).unwrap();

    assert_eq!(bad_count, 2);
    assert_eq!(bad_count, clean_count);
    assert_eq!(with_bad, clean);

    let err = materialize_strict(cursor_over(documents), &mut with_bad).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::DecodeError);
    assert_eq!(with_bad.len(), 2);
}

#[test]
fn test_decode_step_after_failure() {
    let cursor = cursor_over(vec![doc! { "sensor": 1 }, doc! { "sensor": "ok", "value": 1.0 }]);
    let mut reading = Reading::default();

    match cursor.decode_next(&mut reading) {
        DecodeStep::Failed(err) => assert_eq!(err.kind(), &ErrorKind::DecodeError),
        other => panic!("expected a decode failure, got {:?}", other),
    }
    assert!(cursor.decode_next(&mut reading).is_decoded());
    assert_eq!(reading.sensor, "ok");
    assert!(matches!(cursor.decode_next(&mut reading), DecodeStep::Exhausted));
    assert!(cursor.error().is_some());
    cursor.close().unwrap();
}

#[test]
fn test_failed_query_fails_every_step() {
    let cursor = SafeCursor::new(Err(OddishError::new("no primary", ErrorKind::BackendError)));
    let mut reading = Reading::default();

    for _ in 0..3 {
        assert!(!cursor.try_decode_next(&mut reading));
    }
    let mut destination: Vec<Reading> = Vec::new();
    let err = materialize(cursor, &mut destination).unwrap_err();
    assert_eq!(err.message(), "no primary");
}

#[test]
fn test_collection_reads_use_configured_strictness() {
    let malformed = doc! { "name": "broken", "age": "unknown" };

    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.collection();
            insert_test_employees(&coll)?;
            coll.insert(&malformed)?;

            let mut employees: Vec<Employee> = Vec::new();
            assert_eq!(coll.find_many(&mut employees, &doc! {}, None)?, 5);
            Ok(())
        },
        cleanup,
    );

    run_test(
        create_strict_test_context,
        |ctx| {
            let coll = ctx.collection();
            insert_test_employees(&coll)?;
            coll.insert(&malformed)?;

            let mut employees: Vec<Employee> = Vec::new();
            let err = coll.find_many(&mut employees, &doc! {}, None).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::DecodeError);
            assert_eq!(employees.len(), 5);
            Ok(())
        },
        cleanup,
    );
}

#[test]
fn test_streaming_with_find_cursor() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.collection();
            insert_test_employees(&coll)?;

            let cursor = coll.find_cursor(&doc! {}, &FindOptions::new().limit(3));
            let mut employee = Employee::default();
            let mut names = Vec::new();
            while cursor.try_decode_next(&mut employee) {
                names.push(employee.name.clone());
            }
            cursor.close()?;
            assert_eq!(names, vec!["ada", "grace", "alan"]);
            Ok(())
        },
        cleanup,
    )
}
