use bson::doc;
use oddish::common::{SortOrder, SortableFields};
use oddish::errors::ErrorKind;
use oddish_int_test::test_util::{
    cleanup, create_test_context, insert_test_employees, is_sorted, run_test, Employee,
};

#[test]
fn test_find_all() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.collection();
            insert_test_employees(&coll)?;

            let mut employees: Vec<Employee> = Vec::new();
            let count = coll.find_many(&mut employees, &doc! {}, None)?;
            assert_eq!(count, 5);
            assert_eq!(employees.len(), 5);
            assert!(employees.iter().all(|e| e.id.is_some()));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_with_filter() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.collection();
            insert_test_employees(&coll)?;
            let mut found: Vec<Employee> = Vec::new();

            assert_eq!(coll.find_many(&mut found, &doc! { "department": "Research" }, None)?, 2);
            assert_eq!(coll.find_many(&mut found, &doc! { "age": { "$gt": 40 } }, None)?, 3);
            assert_eq!(coll.find_many(&mut found, &doc! { "address.city": "London" }, None)?, 2);
            assert_eq!(coll.find_many(&mut found, &doc! { "tags": "sales" }, None)?, 1);

            let either = doc! { "$or": [ { "age": { "$lt": 30 } }, { "name": "edsger" } ] };
            assert_eq!(coll.find_many(&mut found, &either, None)?, 2);

            let names = doc! { "name": { "$in": ["ada", "alan", "nobody"] } };
            assert_eq!(coll.find_many(&mut found, &names, None)?, 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_sorted() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.collection();
            insert_test_employees(&coll)?;
            let mut found: Vec<Employee> = Vec::new();

            let by_age = SortableFields::new().add_sorted_field("age", SortOrder::Descending);
            coll.find_many(&mut found, &doc! {}, Some(&by_age))?;
            let ages: Vec<i32> = found.iter().map(|e| e.age).collect();
            assert!(is_sorted(&ages, false));

            let by_department_then_salary = SortableFields::new()
                .add_field("department")
                .add_sorted_field("salary", SortOrder::Descending);
            coll.find_many(&mut found, &doc! {}, Some(&by_department_then_salary))?;
            let names: Vec<&str> = found.iter().map(|e| e.name.as_str()).collect();
            assert_eq!(names, vec!["grace", "ada", "alan", "edsger", "barbara"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_reuses_destination() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.collection();
            insert_test_employees(&coll)?;

            let mut found = vec![Employee::default(); 8];
            let count = coll.find_many(&mut found, &doc! { "department": "Engineering" }, None)?;
            assert_eq!(count, 2);
            assert_eq!(found.len(), 2);
            assert_eq!(found[0].name, "ada");
            assert_eq!(found[1].name, "grace");

            let count = coll.find_many(&mut found, &doc! {}, None)?;
            assert_eq!(count, 5);
            assert_eq!(found.len(), 5);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_one() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.collection();
            insert_test_employees(&coll)?;

            let found: Option<Employee> = coll.find_one(&doc! { "address.city": "Austin" })?;
            assert_eq!(found.map(|e| e.name), Some("edsger".to_string()));

            let missing: Option<Employee> = coll.find_one(&doc! { "department": "Legal" })?;
            assert!(missing.is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_count() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.collection();
            assert_eq!(coll.count(&doc! {})?, 0);

            insert_test_employees(&coll)?;
            assert_eq!(coll.count(&doc! {})?, 5);
            assert_eq!(coll.count(&doc! { "salary": { "$gte": 110_000.0 } })?, 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_with_invalid_filter() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.collection();
            insert_test_employees(&coll)?;

            let mut found = vec![Employee::default(); 3];
            let err = coll
                .find_many(&mut found, &doc! { "name": { "$regex": "^a" } }, None)
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::FilterError);
            assert_eq!(found.len(), 3);
            assert!(found.iter().all(|e| e.name.is_empty()));
            Ok(())
        },
        cleanup,
    )
}
