use bson::oid::ObjectId;
use bson::{doc, Bson, Document};
use oddish::errors::ErrorKind;
use oddish::store::CollectionHandle;
use oddish_int_test::test_util::{
    cleanup, create_test_context, insert_test_employees, run_test, Employee,
};

#[test]
fn test_insert_typed_value() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.collection();
            let employee = Employee::new("ada", 36, "Engineering", 120_000.0, "London");
            let result = coll.insert(&employee)?;
            assert!(matches!(result.inserted_id, Bson::ObjectId(_)));

            let stored: Vec<Document> = {
                let mut docs = Vec::new();
                coll.find_many(&mut docs, &bson::doc! {}, None)?;
                docs
            };
            assert_eq!(stored.len(), 1);
            assert_eq!(stored[0].get_str("name").unwrap(), "ada");
            assert_eq!(stored[0].get_document("address").unwrap().get_str("city").unwrap(), "London");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_keeps_caller_id() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.collection();
            let id = ObjectId::new();
            let mut employee = Employee::new("grace", 45, "Engineering", 135_000.0, "Arlington");
            employee.id = Some(id);

            let result = coll.insert(&employee)?;
            assert_eq!(result.inserted_id, Bson::ObjectId(id));

            let err = coll.insert(&employee).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::DuplicateKey);
            assert_eq!(ctx.handle().len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_rejects_non_document_values() {
    run_test(
        create_test_context,
        |ctx| {
            let err = ctx.collection().insert(&vec![1, 2, 3]).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::EncodeError);
            assert!(ctx.handle().is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_by_id() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.collection();
            let ids = insert_test_employees(&coll)?;

            let result = coll.update_by_id(
                ids[0].to_hex(),
                &doc! { "$set": { "address.city": "Paris" }, "$inc": { "age": 1 } },
            )?;
            assert_eq!(result.matched_count, 1);
            assert_eq!(result.modified_count, 1);

            let ada: Employee = coll.find_by_id(ids[0])?.unwrap();
            assert_eq!(ada.age, 37);
            assert_eq!(ada.address.city, "Paris");

            let others: Option<Employee> = coll.find_one(&doc! { "name": "grace", "age": 45 })?;
            assert!(others.is_some());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_unknown_id_matches_nothing() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.collection();
            insert_test_employees(&coll)?;

            let result = coll.update_by_id("garbage", &doc! { "$set": { "age": 1 } })?;
            assert_eq!(result.matched_count, 0);
            assert_eq!(result.modified_count, 0);
            assert_eq!(coll.count(&doc! { "age": 1 })?, 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_without_operators_is_rejected() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.collection();
            let ids = insert_test_employees(&coll)?;

            let err = coll.update_by_id(ids[1], &doc! { "age": 1 }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);

            let grace: Employee = coll.find_by_id(ids[1])?.unwrap();
            assert_eq!(grace.age, 45);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_delete_by_id() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.collection();
            let ids = insert_test_employees(&coll)?;

            assert_eq!(coll.delete_by_id(ids[4])?.deleted_count, 1);
            assert_eq!(coll.delete_by_id(ids[4].to_hex())?.deleted_count, 0);
            assert_eq!(coll.delete_by_id("not-an-id")?.deleted_count, 0);
            assert_eq!(coll.count(&doc! {})?, 4);
            assert_eq!(ctx.handle().count_documents(&doc! { "name": "barbara" })?, 0);
            Ok(())
        },
        cleanup,
    )
}
