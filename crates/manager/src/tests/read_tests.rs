use super::helpers::small_config;
use crate::Manager;
use tempfile::tempdir;

#[test]
fn scenario_s1_put_then_get_batch() {
    let dir = tempdir().unwrap();
    let mut cfg = small_config();
    cfg.max_keys_per_sstable = 100;
    let mut m = Manager::recover(dir.path(), &cfg).unwrap();

    m.put("a", "1").unwrap();
    m.put("b", "2").unwrap();

    assert_eq!(m.get("a").unwrap(), Some("1".to_string()));
    assert_eq!(m.get("b").unwrap(), Some("2".to_string()));
    assert_eq!(m.get("c").unwrap(), None);
}

#[test]
fn scenario_s3_overwrite_then_seal_then_overwrite_again() {
    let dir = tempdir().unwrap();
    let mut cfg = small_config();
    cfg.max_keys_per_sstable = 1;
    let mut m = Manager::recover(dir.path(), &cfg).unwrap();

    m.put("a", "1").unwrap();
    // threshold of 1 already rolled after the put above.
    m.put("a", "2").unwrap();
    assert_eq!(m.get("a").unwrap(), Some("2".to_string()));

    m.put("a", "3").unwrap();
    assert_eq!(m.get("a").unwrap(), Some("3".to_string()));
}

#[test]
fn newest_first_visibility_across_tables() {
    let dir = tempdir().unwrap();
    let mut cfg = small_config();
    cfg.max_keys_per_sstable = 1;
    let mut m = Manager::recover(dir.path(), &cfg).unwrap();

    m.put("k", "old").unwrap(); // lands in table 1, which then seals
    m.put("k", "new").unwrap(); // lands in the fresh active table

    assert_eq!(m.get("k").unwrap(), Some("new".to_string()));
}

#[test]
fn missing_key_across_empty_manager_returns_none() {
    let dir = tempdir().unwrap();
    let m = Manager::recover(dir.path(), &small_config()).unwrap();
    assert_eq!(m.get("never-written").unwrap(), None);
}
