use bson::doc;
use oddish::collection::{FindOptions, OddishCollection};
use oddish::common::SortableFields;
use oddish::store::memory::InMemoryCollection;
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::HashSet;
use std::thread;

#[derive(Debug, Clone, Default, Deserialize)]
struct Ticket {
    seq: i32,
    label: String,
    checksum: i64,
}

fn ticket_collection(count: i32) -> OddishCollection {
    let handle = InMemoryCollection::new("tickets");
    let coll = OddishCollection::new(handle);
    for seq in 0..count {
        coll.insert(&doc! {
            "seq": seq,
            "label": format!("ticket-{}", seq),
            "checksum": (seq as i64) * 31,
        })
        .unwrap();
    }
    coll
}

#[test]
fn test_shared_cursor_hands_out_each_document_once() {
    let total = 1_000;
    let coll = ticket_collection(total);
    let cursor = coll.find_cursor(&doc! {}, &FindOptions::new());
    let seen = Mutex::new(Vec::new());

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let mut ticket = Ticket::default();
                let mut mine = Vec::new();
                while cursor.try_decode_next(&mut ticket) {
                    mine.push(ticket.clone());
                }
                seen.lock().extend(mine);
            });
        }
    });
    cursor.close().unwrap();

    let seen = seen.into_inner();
    assert_eq!(seen.len(), total as usize);

    let unique: HashSet<i32> = seen.iter().map(|t| t.seq).collect();
    assert_eq!(unique.len(), total as usize);

    for ticket in &seen {
        assert_eq!(ticket.label, format!("ticket-{}", ticket.seq));
        assert_eq!(ticket.checksum, ticket.seq as i64 * 31);
    }
}

#[test]
fn test_each_reader_sees_cursor_order() {
    let coll = ticket_collection(500);
    let cursor = coll.find_cursor(&doc! {}, &FindOptions::new());

    let per_thread: Vec<Vec<i32>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let mut ticket = Ticket::default();
                    let mut mine = Vec::new();
                    while cursor.try_decode_next(&mut ticket) {
                        mine.push(ticket.seq);
                    }
                    mine
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for sequence in per_thread {
        assert!(sequence.windows(2).all(|pair| pair[0] < pair[1]));
    }
}

#[test]
fn test_concurrent_collection_use() {
    let coll = ticket_collection(50);
    let by_seq = SortableFields::new().add_field("seq");

    thread::scope(|scope| {
        for worker in 0..4 {
            let coll = coll.clone();
            let by_seq = by_seq.clone();
            scope.spawn(move || {
                for round in 0..10 {
                    let mut page: Vec<Ticket> = Vec::new();
                    let pages = coll
                        .find_page(&mut page, &doc! {}, Some(&by_seq), round % 5 + 1, 10)
                        .unwrap();
                    assert!(pages >= 5);
                    assert_eq!(page.len(), 10);

                    coll.insert(&doc! {
                        "seq": 1_000 + worker * 100 + round as i32,
                        "label": "extra",
                        "checksum": 0_i64,
                    })
                    .unwrap();
                }
            });
        }
    });

    assert_eq!(coll.count(&doc! {}).unwrap(), 90);
}
