use bson::oid::ObjectId;
use bson::{doc, Document};
use oddish::collection::OddishCollection;
use oddish::errors::{ErrorKind, OddishError, OddishResult};
use oddish::oddish_config::OddishConfig;
use oddish::store::memory::InMemoryCollection;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Runs `test` between `before` and `after`, reporting failures and panics
/// with the stage they came from. `after` runs even when `test` fails.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> OddishResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> OddishResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> OddishResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let start_time = Instant::now();

    let result = std::panic::catch_unwind(|| match before() {
        Ok(ctx) => match test(ctx.clone()) {
            Ok(_) => after(ctx).map_err(|e| format!("After run failed: {:?}", e)),
            Err(e) => {
                let _ = after(ctx);
                Err(format!("Test failed: {:?}", e))
            }
        },
        Err(e) => Err(format!("Before run failed: {:?}", e)),
    });

    let failure = match result {
        Ok(Ok(_)) => return,
        Ok(Err(message)) => message,
        Err(panic_err) => {
            if let Some(s) = panic_err.downcast_ref::<&str>() {
                format!("Panic: {}", s)
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                format!("Panic: {}", s)
            } else {
                "Panic: unknown payload".to_string()
            }
        }
    };

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Took {:?}", start_time.elapsed());
    eprintln!("{}", failure);
    eprintln!("=====================================================\n");
    panic!("{}", failure);
}

#[derive(Clone)]
pub struct TestContext {
    handle: InMemoryCollection,
    collection: OddishCollection,
}

impl TestContext {
    pub fn new(handle: InMemoryCollection, collection: OddishCollection) -> Self {
        Self { handle, collection }
    }

    /// The backend the collection writes to.
    pub fn handle(&self) -> InMemoryCollection {
        self.handle.clone()
    }

    pub fn collection(&self) -> OddishCollection {
        self.collection.clone()
    }
}

pub fn create_test_context() -> OddishResult<TestContext> {
    create_context_with(OddishConfig::default())
}

/// A context whose collection reports decode failures.
pub fn create_strict_test_context() -> OddishResult<TestContext> {
    create_context_with(OddishConfig::new().strict_decode(true))
}

fn create_context_with(config: OddishConfig) -> OddishResult<TestContext> {
    let handle = InMemoryCollection::new("employees");
    let collection = OddishCollection::with_config(handle.clone(), config);
    Ok(TestContext::new(handle, collection))
}

pub fn cleanup(ctx: TestContext) -> OddishResult<()> {
    ctx.handle().clear();
    if !ctx.handle().is_empty() {
        return Err(OddishError::new(
            "collection still has documents after cleanup",
            ErrorKind::InternalError,
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub age: i32,
    pub department: String,
    pub salary: f64,
    pub address: Address,
    pub tags: Vec<String>,
}

impl Employee {
    pub fn new(name: &str, age: i32, department: &str, salary: f64, city: &str) -> Self {
        Employee {
            id: None,
            name: name.to_string(),
            age,
            department: department.to_string(),
            salary,
            address: Address {
                street: format!("{} street", name),
                city: city.to_string(),
            },
            tags: vec![department.to_lowercase()],
        }
    }
}

pub fn create_test_employees() -> Vec<Employee> {
    vec![
        Employee::new("ada", 36, "Engineering", 120_000.0, "London"),
        Employee::new("grace", 45, "Engineering", 135_000.0, "Arlington"),
        Employee::new("alan", 41, "Research", 110_000.0, "Manchester"),
        Employee::new("edsger", 52, "Research", 105_000.0, "Austin"),
        Employee::new("barbara", 29, "Sales", 80_000.0, "London"),
    ]
}

/// Inserts the test employees in order and returns their generated ids.
pub fn insert_test_employees(collection: &OddishCollection) -> OddishResult<Vec<ObjectId>> {
    let mut ids = Vec::new();
    for employee in create_test_employees() {
        let result = collection.insert(&employee)?;
        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            OddishError::new("inserted id is not an ObjectId", ErrorKind::InternalError)
        })?;
        ids.push(id);
    }
    Ok(ids)
}

/// Inserts `count` numbered documents: `{ "seq": i, "even": i % 2 == 0 }`.
pub fn insert_sequence(collection: &OddishCollection, count: i32) -> OddishResult<()> {
    for seq in 0..count {
        collection.insert(&doc! { "seq": seq, "even": seq % 2 == 0 })?;
    }
    Ok(())
}

pub fn sequence_of(documents: &[Document]) -> Vec<i32> {
    documents
        .iter()
        .filter_map(|document| document.get_i32("seq").ok())
        .collect()
}

pub fn is_sorted<T: PartialOrd>(values: &[T], ascending: bool) -> bool {
    values.windows(2).all(|pair| {
        if ascending {
            pair[0] <= pair[1]
        } else {
            pair[0] >= pair[1]
        }
    })
}
