use super::*;

// -------------------- Construction --------------------

#[test]
fn new_creates_valid_filter() {
    let f = Filter::new(100, 0.01);
    assert!(f.num_bits() > 0);
    assert!(f.num_hashes() > 0);
    assert!(!f.bits.is_empty());
}

#[test]
#[should_panic(expected = "expected_items must be > 0")]
fn new_panics_on_zero_items() {
    Filter::new(0, 0.01);
}

#[test]
#[should_panic(expected = "false_positive_rate must be in (0, 1)")]
fn new_panics_on_zero_fpr() {
    Filter::new(100, 0.0);
}

#[test]
#[should_panic(expected = "false_positive_rate must be in (0, 1)")]
fn new_panics_on_one_fpr() {
    Filter::new(100, 1.0);
}

#[test]
#[should_panic(expected = "num_bits must be > 0")]
fn with_params_panics_on_zero_bits() {
    Filter::with_params(0, 4);
}

#[test]
#[should_panic(expected = "num_hashes must be > 0")]
fn with_params_panics_on_zero_hashes() {
    Filter::with_params(64, 0);
}

// -------------------- Add / might_contain --------------------

#[test]
fn added_key_is_found() {
    let mut f = Filter::new(100, 0.01);
    f.add(b"hello");
    assert!(f.might_contain(b"hello"));
}

#[test]
fn missing_key_is_not_found() {
    let f = Filter::new(100, 0.01);
    assert!(!f.might_contain(b"hello"));
}

#[test]
fn no_false_negatives_across_many_keys() {
    let mut f = Filter::new(1000, 0.01);
    for i in 0..1000u64 {
        f.add(&i.to_le_bytes());
    }
    for i in 0..1000u64 {
        assert!(f.might_contain(&i.to_le_bytes()), "key {} should be found", i);
    }
}

#[test]
fn false_positive_rate_is_reasonable() {
    let n = 10_000;
    let fpr = 0.01;
    let mut f = Filter::new(n, fpr);

    for i in 0..n as u64 {
        f.add(&i.to_le_bytes());
    }

    let mut false_positives = 0;
    let test_count = 10_000;
    for i in (n as u64)..(n as u64 + test_count) {
        if f.might_contain(&i.to_le_bytes()) {
            false_positives += 1;
        }
    }

    let actual_fpr = false_positives as f64 / test_count as f64;
    // Allow up to 3x the target FPR (statistical variance)
    assert!(
        actual_fpr < fpr * 3.0,
        "FPR too high: {:.4} (target {:.4})",
        actual_fpr,
        fpr
    );
}

#[test]
fn empty_key() {
    let mut f = Filter::new(10, 0.01);
    f.add(b"");
    assert!(f.might_contain(b""));
}

#[test]
fn binary_key() {
    let mut f = Filter::new(10, 0.01);
    let key = vec![0u8, 1, 2, 255, 254, 253];
    f.add(&key);
    assert!(f.might_contain(&key));
}

// -------------------- clear --------------------

#[test]
fn clear_forgets_all_keys() {
    let mut f = Filter::new(100, 0.01);
    f.add(b"a");
    f.add(b"b");
    f.clear();
    // after clear, every bit is zero so might_contain can only return
    // true by chance of an all-zero hash index set, which cannot happen
    // here since at least one probe bit was set before clearing and is
    // now unset.
    assert!(!f.might_contain(b"a"));
    assert!(!f.might_contain(b"b"));
}

// -------------------- Debug --------------------

#[test]
fn debug_impl_works() {
    let f = Filter::new(100, 0.01);
    let debug = format!("{:?}", f);
    assert!(debug.contains("Filter"));
    assert!(debug.contains("num_bits"));
    assert!(debug.contains("num_hashes"));
}

// -------------------- Edge cases --------------------

#[test]
fn single_item_filter() {
    let mut f = Filter::new(1, 0.01);
    f.add(b"only");
    assert!(f.might_contain(b"only"));
}

#[test]
fn very_low_fpr() {
    let f = Filter::new(100, 0.0001);
    assert!(f.num_bits() > 1000);
    assert!(f.num_hashes() > 5);
}

#[test]
fn high_fpr_still_works() {
    let mut f = Filter::new(100, 0.5);
    f.add(b"test");
    assert!(f.might_contain(b"test"));
}

#[test]
fn with_params_matches_manual_sizing() {
    let f = Filter::with_params(4096, 7);
    assert_eq!(f.num_bits(), 4096);
    assert_eq!(f.num_hashes(), 7);
}
