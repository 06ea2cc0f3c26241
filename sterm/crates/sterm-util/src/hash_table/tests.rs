//! Tests for the HashTable module.

use super::*;

fn key(n: usize) -> String {
    format!("sym_{}", n)
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn test_rounded_size_shapes() {
    let size = |initial_size| {
        HashTableConfig {
            initial_size,
            ..Default::default()
        }
        .rounded_size()
    };

    assert_eq!(size(0), 127);
    assert_eq!(size(127), 127);
    assert_eq!(size(128), 255);
    assert_eq!(size(1000), 1023);
}

#[test]
fn test_validate_rejects_bad_load() {
    let config = HashTableConfig {
        max_load_percent: 100,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidLoadPercent { percent: 100, .. })
    ));
    assert!(HashTable::<String>::with_config(config).is_err());
}

#[test]
fn test_validate_rejects_huge_size() {
    let config = HashTableConfig {
        initial_size: MAX_TABLE_SIZE + 1,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidInitialSize(_))
    ));
}

// ============================================================================
// PUT / INDEX / GET
// ============================================================================

#[test]
fn test_put_new_and_existing() {
    let mut table: HashTable<String> = HashTable::new();
    let (a, new_a) = table.put(key(1));
    let (b, new_b) = table.put(key(2));
    let (a2, new_a2) = table.put(key(1));

    assert!(new_a);
    assert!(new_b);
    assert!(!new_a2);
    assert_eq!(a, a2);
    assert_ne!(a, b);
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(a), "sym_1");
}

#[test]
fn test_put_with_builds_only_on_miss() {
    let mut table: HashTable<String> = HashTable::new();
    let mut built = 0;

    let (first, _) = table.put_with("f", || {
        built += 1;
        "f".to_string()
    });
    let (second, is_new) = table.put_with("f", || {
        built += 1;
        "f".to_string()
    });

    assert_eq!(first, second);
    assert!(!is_new);
    assert_eq!(built, 1);
}

#[test]
fn test_index_absent() {
    let mut table: HashTable<String> = HashTable::new();
    table.put(key(1));
    assert_eq!(table.index("missing"), None);
    assert!(!table.contains("missing"));
    assert!(table.contains("sym_1"));
}

#[test]
#[should_panic(expected = "is not live")]
fn test_get_erased_panics() {
    let mut table: HashTable<String> = HashTable::new();
    let (idx, _) = table.put(key(1));
    table.erase("sym_1");
    let _ = table.get(idx);
}

// ============================================================================
// ERASE AND RECYCLING
// ============================================================================

#[test]
fn test_erase_recycles_lifo() {
    let mut table: HashTable<String> = HashTable::new();
    let (a, _) = table.put(key(1));
    let (b, _) = table.put(key(2));
    table.put(key(3));

    assert!(table.erase("sym_1"));
    assert!(table.erase("sym_2"));
    assert!(!table.erase("sym_2"));

    let (c, _) = table.put(key(4));
    let (d, _) = table.put(key(5));
    assert_eq!(c, b);
    assert_eq!(d, a);
    assert_eq!(table.stats().dense_len, 3);
}

#[test]
fn test_remove_index_returns_key() {
    let mut table: HashTable<String> = HashTable::new();
    let (idx, _) = table.put(key(7));
    assert_eq!(table.remove_index(idx), Some(key(7)));
    assert_eq!(table.remove_index(idx), None);
    assert_eq!(table.index("sym_7"), None);
    assert_eq!(table.stats().tombstones, 1);
}

#[test]
fn test_tombstone_reused_on_insert() {
    let mut table: HashTable<String> = HashTable::new();
    table.put(key(1));
    table.erase("sym_1");
    assert_eq!(table.stats().tombstones, 1);

    table.put(key(1));
    assert_eq!(table.stats().tombstones, 0);
}

#[test]
fn test_probe_passes_tombstones() {
    let mut table: HashTable<String> = HashTable::new();
    for n in 0..60 {
        table.put(key(n));
    }
    for n in (0..60).step_by(2) {
        assert!(table.erase(key(n).as_str()));
    }
    for n in (1..60).step_by(2) {
        assert!(table.contains(key(n).as_str()), "lost {}", n);
    }
}

// ============================================================================
// RESIZE
// ============================================================================

#[test]
fn test_growth_keeps_indices() {
    let mut table: HashTable<String> = HashTable::new();
    let indices: Vec<usize> = (0..1000).map(|n| table.put(key(n)).0).collect();

    assert!(table.size() > MIN_TABLE_SIZE);
    assert!((table.size() + 1).is_power_of_two());
    for (n, idx) in indices.iter().enumerate() {
        assert_eq!(table.index(key(n).as_str()), Some(*idx));
        assert_eq!(table.get(*idx), &key(n));
    }
}

#[test]
fn test_churn_purges_without_growing() {
    let mut table: HashTable<String> = HashTable::new();
    for round in 0..500 {
        let (idx, _) = table.put(key(round));
        table.remove_index(idx);
    }

    let stats = table.stats();
    assert_eq!(stats.size, MIN_TABLE_SIZE);
    assert_eq!(stats.live, 0);
    assert_eq!(stats.dense_len, 1);
    assert!(stats.tombstones < 95);
}

#[test]
fn test_clear() {
    let mut table: HashTable<String> = HashTable::new();
    for n in 0..10 {
        table.put(key(n));
    }
    table.clear();
    assert!(table.is_empty());
    assert_eq!(table.index("sym_3"), None);
    assert_eq!(table.put(key(3)).0, 0);
}

#[test]
fn test_iter_skips_erased() {
    let mut table: HashTable<String> = HashTable::new();
    table.put(key(0));
    table.put(key(1));
    table.put(key(2));
    table.erase("sym_1");

    let live: Vec<_> = table.iter().map(|(i, k)| (i, k.clone())).collect();
    assert_eq!(live, vec![(0, key(0)), (2, key(2))]);
}

#[test]
fn test_load_factor() {
    let stats = TableStats {
        live: 50,
        tombstones: 50,
        size: 200,
        ..Default::default()
    };
    assert_eq!(stats.load_factor(), 0.5);
    assert_eq!(TableStats::default().load_factor(), 0.0);
}
