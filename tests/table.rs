// Table unit test suite (public API).
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Round-trip: a lookup right after a write returns what was written.
// - Merge rules: counters add, byte buffers are replaced, kinds are fixed
//   per key once written.
// - Sizing: capacity is a power of two, starts at 1024, and stays above
//   twice the number of entries.
// - Growth: every entry survives any number of doublings; refused growth
//   changes nothing.
// - Iteration: a fresh cursor or iterator visits each entry exactly once.
use probe_table::{Payload, Table, TableConfig, TableError, Value, ValueKind};
use std::collections::BTreeMap;
use std::sync::Mutex;

// Test: counter scenario.
// Assumes: a fresh table.
// Verifies: "apple" +5 then +3 reads back 8; the update does not add a slot.
#[test]
fn counter_scenario_apple() {
    let mut t = Table::new();
    t.upsert("apple", Payload::Counter(5)).unwrap();
    t.upsert("apple", Payload::Counter(3)).unwrap();
    assert_eq!(t.get("apple"), Some(&Value::Counter(8)));
    assert_eq!(t.len(), 1);
}

// Test: byte scenario.
// Assumes: NUL-terminated mode copies the whole string when it has no NUL.
// Verifies: "a" -> "hello"; length 1.
#[test]
fn bytes_scenario_hello() {
    let mut t = Table::new();
    t.upsert("a", Payload::Terminated(b"hello")).unwrap();
    assert_eq!(t.get_bytes("a"), Some(&b"hello"[..]));
    assert_eq!(t.len(), 1);
}

// Test: byte overwrite.
// Assumes: a second write of the same key replaces the buffer.
// Verifies: "abc" then "de" yields "de", not "dec" or "abcde".
#[test]
fn bytes_overwrite_is_not_append() {
    let mut t = Table::new();
    t.upsert("k", "abc".into()).unwrap();
    t.upsert("k", "de".into()).unwrap();
    assert_eq!(t.get("k"), Some(&Value::Bytes(b"de".to_vec())));
}

// Test: length-bounded mode.
// Assumes: Bounded copies min(len, bytes.len()) bytes, keeping embedded NULs.
// Verifies: truncation, embedded NULs, zero length is a present empty value.
#[test]
fn bounded_mode_copies_at_most_len() {
    let mut t = Table::new();
    t.put_bounded("trunc", b"abcdef", 2).unwrap();
    t.put_bounded("nul", b"a\0b\0", 4).unwrap();
    t.put_bounded("zero", b"abc", 0).unwrap();
    t.put_bounded("short", b"xy", 100).unwrap();

    assert_eq!(t.get_bytes("trunc"), Some(&b"ab"[..]));
    assert_eq!(t.get_bytes("nul"), Some(&b"a\0b\0"[..]));
    assert_eq!(t.get_bytes("zero"), Some(&b""[..]));
    assert!(t.contains_key("zero"));
    assert_eq!(t.get_bytes("short"), Some(&b"xy"[..]));
    assert_eq!(t.len(), 4);
}

// Test: lookups of absent keys.
// Assumes: probing stops at the first empty slot.
// Verifies: absent keys and prefixes of present keys are not found.
#[test]
fn absent_keys_are_not_found() {
    let mut t = Table::new();
    t.add("present", 1).unwrap();
    assert_eq!(t.get("absent"), None);
    assert_eq!(t.get("pres"), None);
    assert_eq!(t.get("present!"), None);
    assert!(!t.contains_key(""));
}

// Test: kind is fixed per key.
// Assumes: Value carries its kind.
// Verifies: the opposite kind is rejected with KindMismatch; value and len unchanged.
#[test]
fn kind_mismatch_is_reported() {
    let mut t = Table::new();
    t.add("n", 7).unwrap();
    match t.upsert("n", "oops".into()) {
        Err(TableError::KindMismatch {
            key,
            stored: ValueKind::Counter,
            incoming: ValueKind::Bytes,
        }) => assert_eq!(key, "n"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(t.get_counter("n"), Some(7));
    assert_eq!(t.len(), 1);
}

// Test: default sizing.
// Assumes: the default request of 1000 slots rounds to a power of two.
// Verifies: a fresh table reports 1024 slots.
#[test]
fn fresh_table_has_1024_slots() {
    assert_eq!(Table::new().capacity(), 1024);
    assert_eq!(Table::try_new().unwrap().capacity(), 1024);
    assert!(Table::default().is_empty());
}

// Test: growth scenario.
// Assumes: a table starts at 1024 slots.
// Verifies: 2000 distinct keys force at least one doubling and all stay retrievable.
#[test]
fn two_thousand_keys_grow_and_survive() {
    let mut t = Table::new();
    let initial = t.capacity();
    for i in 0..2000 {
        t.add(&format!("key-{}", i), i).unwrap();
    }
    assert!(t.capacity() >= initial * 2);
    assert_eq!(t.capacity(), 4096);
    assert_eq!(t.len(), 2000);
    for i in 0..2000 {
        assert_eq!(t.get_counter(&format!("key-{}", i)), Some(i));
    }
}

// Test: load factor.
// Assumes: growth runs before a write would bring len to capacity / 2.
// Verifies: capacity > 2 * len after every distinct insert.
#[test]
fn load_factor_stays_below_half() {
    let config = TableConfig::builder().initial_capacity(4).build();
    let mut t = Table::with_config(config).unwrap();
    for i in 0..500 {
        t.put_str(&i.to_string(), "v").unwrap();
        assert!(t.capacity() > 2 * t.len(), "len {} cap {}", t.len(), t.capacity());
    }
}

// Test: refused growth.
// Assumes: max_capacity bounds growth.
// Verifies: the triggering write fails with CapacityOverflow and nothing changes;
// existing keys keep accepting updates at the limit.
#[test]
fn growth_limit_is_an_error_not_a_silent_drop() {
    let config = TableConfig::builder()
        .initial_capacity(16)
        .max_capacity(16)
        .build();
    let mut t = Table::with_config(config).unwrap();
    for i in 0..7 {
        t.add(&i.to_string(), 1).unwrap();
    }
    let err = t.add("overflow", 1).unwrap_err();
    assert_eq!(
        err,
        TableError::CapacityOverflow {
            capacity: 16,
            limit: 16
        }
    );
    assert_eq!(t.capacity(), 16);
    assert_eq!(t.len(), 7);
    assert!(!t.contains_key("overflow"));
    for i in 0..7 {
        assert_eq!(t.get_counter(&i.to_string()), Some(1));
    }
    t.add("0", 1).unwrap();
    assert_eq!(t.get_counter("0"), Some(2));
    assert_eq!(t.capacity(), 16);
    assert_eq!(t.len(), 7);
}

// Test: configuration errors surface at creation.
// Assumes: initial slot count must fit under max_capacity.
// Verifies: with_config returns CapacityOverflow rather than a broken table.
#[test]
fn creation_rejects_initial_above_limit() {
    let config = TableConfig::builder()
        .initial_capacity(1000)
        .max_capacity(512)
        .build();
    assert!(matches!(
        Table::with_config(config),
        Err(TableError::CapacityOverflow { .. })
    ));
}

// Test: cursor protocol.
// Assumes: cursor starts before the first slot.
// Verifies: advance() yields each entry once, then stays false.
#[test]
fn cursor_visits_every_entry_once() {
    let mut t = Table::new();
    for i in 0..50 {
        t.add(&format!("c{}", i), i).unwrap();
    }
    let mut c = t.cursor();
    assert!(c.key().is_none());
    let mut seen = BTreeMap::new();
    while c.advance() {
        let prev = seen.insert(c.key().unwrap().to_string(), c.value().unwrap().clone());
        assert!(prev.is_none(), "entry visited twice");
    }
    assert!(!c.advance());
    assert_eq!(seen.len(), 50);
    for i in 0..50 {
        assert_eq!(seen.get(&format!("c{}", i)), Some(&Value::Counter(i)));
    }
}

// Test: iterator and cursor agree.
// Assumes: both scan physical slot order.
// Verifies: identical sequences.
#[test]
fn iter_and_cursor_share_order() {
    let mut t = Table::new();
    for w in ["pear", "fig", "kiwi", "lime", "plum"] {
        t.put_str(w, w).unwrap();
    }
    let from_iter: Vec<&str> = t.iter().map(|(k, _)| k).collect();
    let mut from_cursor = Vec::new();
    let mut c = t.cursor();
    while c.advance() {
        from_cursor.push(c.key().unwrap());
    }
    assert_eq!(from_iter, from_cursor);
    assert_eq!((&t).into_iter().count(), 5);
}

// Test: teardown.
// Assumes: into_iter consumes the table.
// Verifies: every owned key and value is handed back.
#[test]
fn into_iter_returns_all_entries() {
    let mut t = Table::new();
    t.add("n", 1).unwrap();
    t.put_str("s", "v").unwrap();
    let all: BTreeMap<String, Value> = t.into_iter().collect();
    assert_eq!(all.len(), 2);
    assert_eq!(all["n"], Value::Counter(1));
    assert_eq!(all["s"], Value::Bytes(b"v".to_vec()));
}

// Test: external locking.
// Assumes: Table is plain owned data.
// Verifies: it can be shared across threads behind a Mutex.
#[test]
fn usable_behind_a_mutex() {
    let t = Mutex::new(Table::new());
    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..100 {
                    t.lock().unwrap().add("hits", 1).unwrap();
                }
            });
        }
    });
    assert_eq!(t.lock().unwrap().get_counter("hits"), Some(400));
}
