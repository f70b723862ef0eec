// Table integration test suite.
//
// Each test documents which observable behavior is verified. The core
// properties exercised:
// - Round trip: a written value is read back until overwritten.
// - Uniqueness: keys() lists each stored key once, however often it was
//   overwritten.
// - Collisions: keys sharing a digest or a bucket stay independent.
// - Multi-get: hits in request order, misses dropped, one hit collapsed.
// - Errors: only undigestable keys fail; misses and absent keys do not.
use chained_table::{
    Digester, DisplayDigester, HashDigester, Lookup, StableBuildHasher, Table, TableConfig,
    TableError,
};
use std::collections::BTreeSet;
use std::fmt;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Mixed key and value types for the reference scenario.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Key {
    Text(&'static str),
    Int(i64),
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Int(i64),
    Float(f64),
}

// Test: the reference scenario with a string and an integer key.
// Verifies: single gets return bare values; a two-key get returns both
// values in request order.
#[test]
fn mixed_key_scenario() {
    init_logging();
    let mut t = Table::new();
    t.set(Key::Text("hey"), Value::Int(123)).unwrap();
    t.set(Key::Int(678), Value::Float(456.5)).unwrap();

    assert_eq!(t.get(&Key::Text("hey")), Ok(Some(&Value::Int(123))));
    assert_eq!(t.get(&Key::Int(678)), Ok(Some(&Value::Float(456.5))));
    assert_eq!(
        t.get_many([&Key::Text("hey"), &Key::Int(678)]),
        Ok(Lookup::Many(vec![&Value::Int(123), &Value::Float(456.5)]))
    );
    assert_eq!(
        t.get_many([&Key::Text("hey")]),
        Ok(Lookup::One(&Value::Int(123)))
    );
}

// Test: empty table.
// Verifies: no keys, misses are "not found" rather than errors.
#[test]
fn empty_table() {
    let t: Table<String, i32> = Table::new();
    assert_eq!(t.keys().count(), 0);
    assert_eq!(t.get("missing"), Ok(None));
    assert!(t.get_many(["missing", "also"]).unwrap().is_missing());
    assert!(t.is_empty());
    assert_eq!(t.bucket_count(), 100);
}

// Test: overwrite.
// Verifies: the latest value wins and the key's bucket does not grow.
#[test]
fn overwrite_is_idempotent() {
    let mut t: Table<String, String> = Table::new();
    t.set("monkey".into(), "565.98".into()).unwrap();
    let bucket = t.bucket_of("monkey").unwrap().expect("bucket assigned");
    let before = t.bucket_len(bucket);

    t.set("monkey".into(), "mammal".into()).unwrap();
    t.set("monkey".into(), "mammal".into()).unwrap();
    assert_eq!(t.get("monkey").unwrap().map(String::as_str), Some("mammal"));
    assert_eq!(t.bucket_len(bucket), before);
    assert_eq!(t.keys().filter(|k| *k == "monkey").count(), 1);
}

// Test: multi-get with a gap.
// Verifies: [k1, k2, k3] with k2 unset yields [v1, v3].
#[test]
fn multi_get_drops_misses_in_order() {
    let mut t: Table<&str, u8> = Table::new();
    t.set("k1", 1).unwrap();
    t.set("k3", 3).unwrap();
    let hits = t.get_many(["k1", "k2", "k3"]).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits, Lookup::Many(vec![&1, &3]));
}

// Test: scale.
// Verifies: 1000 distinct integer keys over 100 buckets are all stored
// once and all retrievable.
#[test]
fn thousand_keys() {
    let mut t: Table<u32, u32> = Table::new();
    for (k, v) in (0..1000).zip((1..=1000).rev()) {
        t.set(k, v).unwrap();
    }
    assert_eq!(t.keys().count(), 1000);
    assert_eq!(t.len(), 1000);
    for k in 0..1000u32 {
        assert_eq!(t.get(&k), Ok(Some(&(1000 - k))));
    }
    let distinct: BTreeSet<u32> = t.keys().copied().collect();
    assert_eq!(distinct.len(), 1000);
    assert_eq!(t.to_string(), "Hashtable <1000 key/val pairs>");
}

// Test: bucket collisions with the default digester.
// Verifies: with one bucket every key shares a chain and keys() keeps
// insertion order.
#[test]
fn single_bucket_keeps_insertion_order() {
    let mut t: Table<String, usize> = Table::with_buckets(1).unwrap();
    let names = ["man", "abacus", "iphone", "monkey"];
    for (i, n) in names.iter().enumerate() {
        t.set((*n).to_string(), i).unwrap();
    }
    t.set("abacus".to_string(), 42).unwrap();
    let keys: Vec<&str> = t.keys().map(String::as_str).collect();
    assert_eq!(keys, names);
    assert_eq!(t.bucket_len(0), 4);
    assert_eq!(t.get("abacus"), Ok(Some(&42)));
}

// Test: absent key.
// Verifies: writing without a key is a silent no-op.
#[test]
fn absent_key_is_noop() {
    init_logging();
    let mut t: Table<String, i32> = Table::new();
    assert!(t.set_opt(None, 5).unwrap().is_none());
    assert!(t.is_empty());
}

// Test: string fallback digester.
// Verifies: keys without `Hash` are stored through their string form and
// a key whose string form fails is reported as unhashable.
#[test]
fn display_fallback_and_unhashable_keys() {
    #[derive(PartialEq, Eq)]
    struct Point {
        x: i32,
        y: i32,
    }
    impl fmt::Display for Point {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            if self.x < 0 {
                return Err(fmt::Error);
            }
            write!(f, "({}, {})", self.x, self.y)
        }
    }

    let mut t: Table<Point, &str, DisplayDigester> =
        Table::with_digester(16, DisplayDigester::default()).unwrap();
    t.set(Point { x: 1, y: 2 }, "a").unwrap();
    t.set(Point { x: 2, y: 1 }, "b").unwrap();
    assert_eq!(t.get(&Point { x: 1, y: 2 }), Ok(Some(&"a")));
    assert_eq!(t.get(&Point { x: 2, y: 1 }), Ok(Some(&"b")));
    assert_eq!(t.get(&Point { x: 3, y: 3 }), Ok(None));

    assert_eq!(
        t.set(Point { x: -1, y: 0 }, "c").err(),
        Some(TableError::UnhashableKey)
    );
    assert_eq!(
        t.get(&Point { x: -1, y: 0 }),
        Err(TableError::UnhashableKey)
    );
    // One undigestable key fails the whole batch instead of counting as a miss.
    assert_eq!(
        t.get_many([&Point { x: 1, y: 2 }, &Point { x: -1, y: 0 }]),
        Err(TableError::UnhashableKey)
    );
    assert_eq!(
        t.get_many([&Point { x: 1, y: 2 }, &Point { x: 9, y: 9 }]),
        Ok(Lookup::One(&"a"))
    );
    assert_eq!(t.len(), 2);
}

// Test: custom configuration.
// Verifies: digest length bounds digests, and invalid shapes are rejected.
#[test]
fn configuration() {
    let config = TableConfig::default()
        .with_bucket_count(10)
        .with_digest_length(1);
    let mut t: Table<u64, u64> = Table::with_config(config).unwrap();
    for k in 0..50 {
        t.set(k, k).unwrap();
    }
    // Ten possible digests, ten buckets: every bucket index is a digest.
    for k in 0..50u64 {
        let digest = t.digester().digest(&k).unwrap();
        assert!(digest < 10);
        assert_eq!(t.bucket_of(&k), Ok(Some(digest as usize)));
    }
    assert_eq!(t.len(), 50);

    assert!(matches!(
        Table::<u64, u64>::with_buckets(0),
        Err(TableError::ZeroBuckets)
    ));
    assert_eq!(
        HashDigester::<StableBuildHasher>::with_length(0)
            .err()
            .map(|e| e.to_string()),
        Some("digest length 0 out of range, expected 1..=19".to_string())
    );
}

// Test: digests are a pure function of the key's value.
// Verifies: two independent tables place equal keys in equal buckets.
#[test]
fn placement_is_deterministic_across_tables() {
    let mut a: Table<String, ()> = Table::with_buckets(37).unwrap();
    let mut b: Table<String, ()> = Table::with_buckets(37).unwrap();
    for i in 0..100 {
        a.set(format!("key-{i}"), ()).unwrap();
    }
    for i in (0..100).rev() {
        b.set(format!("key-{i}"), ()).unwrap();
    }
    for i in 0..100 {
        let k = format!("key-{i}");
        assert_eq!(a.bucket_of(k.as_str()), b.bucket_of(k.as_str()));
    }
}

// Test: debug output.
// Verifies: Debug renders the stored pairs as a map.
#[test]
fn debug_lists_pairs() {
    let mut t: Table<&str, i32> = Table::with_buckets(1).unwrap();
    t.set("a", 1).unwrap();
    t.set("b", 2).unwrap();
    assert_eq!(format!("{t:?}"), r#"{"a": 1, "b": 2}"#);
}
