use super::*;

#[test]
fn put_then_get_returns_value() {
    let c = Cache::new();
    c.put("a".to_string(), "1".to_string());
    assert_eq!(c.get("a"), Some("1".to_string()));
}

#[test]
fn missing_key_returns_none() {
    let c = Cache::new();
    assert_eq!(c.get("missing"), None);
}

#[test]
fn put_overwrites_existing_value() {
    let c = Cache::new();
    c.put("a".to_string(), "1".to_string());
    c.put("a".to_string(), "2".to_string());
    assert_eq!(c.get("a"), Some("2".to_string()));
}

#[test]
fn write_is_visible_immediately() {
    let c = Cache::new();
    c.put("a".to_string(), "1".to_string());
    // No intervening synchronization beyond the put call itself.
    assert_eq!(c.get("a"), Some("1".to_string()));
}

#[test]
fn len_and_is_empty() {
    let c = Cache::new();
    assert!(c.is_empty());
    c.put("a".to_string(), "1".to_string());
    assert_eq!(c.len(), 1);
    assert!(!c.is_empty());
}

#[test]
fn concurrent_writes_to_distinct_keys() {
    use std::sync::Arc;
    use std::thread;

    let cache = Arc::new(Cache::new());
    let mut handles = Vec::new();
    for i in 0..8 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            cache.put(format!("key{i}"), format!("value{i}"));
        }));
    }
    for h in handles {
        h.join().unwrap();
    }
    for i in 0..8 {
        assert_eq!(cache.get(&format!("key{i}")), Some(format!("value{i}")));
    }
}
