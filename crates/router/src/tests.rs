use super::*;
use manager::ManagerConfig;

fn small_config() -> ManagerConfig {
    ManagerConfig {
        bloom_filter_size: 1024,
        bloom_hash_count: 4,
        max_keys_per_sstable: 100,
        compaction_threshold: 3,
    }
}

async fn new_router() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let handle = ManagerHandle::spawn(dir.path().to_path_buf(), small_config())
        .await
        .unwrap();
    let cache = Arc::new(Cache::new());
    (Router::new(cache, handle), dir)
}

#[tokio::test]
async fn scenario_s1_put_batch_then_get_batch() {
    let (router, _dir) = new_router().await;

    router
        .put(vec![
            NewKeyEntry {
                key: "a".to_string(),
                value: vec!["1".to_string()],
            },
            NewKeyEntry {
                key: "b".to_string(),
                value: vec!["2".to_string()],
            },
        ])
        .await
        .unwrap();

    let results = router
        .get(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        .await;

    assert_eq!(
        results,
        vec![
            vec!["1".to_string()],
            vec!["2".to_string()],
            Vec::<String>::new(),
        ]
    );
}

#[tokio::test]
async fn multi_fragment_value_is_joined_and_split_back() {
    let (router, _dir) = new_router().await;

    router
        .put(vec![NewKeyEntry {
            key: "k".to_string(),
            value: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        }])
        .await
        .unwrap();

    let results = router.get(vec!["k".to_string()]).await;
    assert_eq!(results, vec![vec!["a".to_string(), "b".to_string(), "c".to_string()]]);
}

#[tokio::test]
async fn write_is_visible_in_cache_immediately_after_put() {
    let (router, _dir) = new_router().await;

    router
        .put(vec![NewKeyEntry {
            key: "a".to_string(),
            value: vec!["1".to_string()],
        }])
        .await
        .unwrap();

    // GET right after PUT must not depend on persistence at all, since the
    // cache was written first and never evicts.
    let results = router.get(vec!["a".to_string()]).await;
    assert_eq!(results, vec![vec!["1".to_string()]]);
}

#[tokio::test]
async fn get_preserves_input_order_including_duplicates() {
    let (router, _dir) = new_router().await;

    router
        .put(vec![NewKeyEntry {
            key: "a".to_string(),
            value: vec!["1".to_string()],
        }])
        .await
        .unwrap();

    let results = router
        .get(vec!["a".to_string(), "missing".to_string(), "a".to_string()])
        .await;
    assert_eq!(
        results,
        vec![vec!["1".to_string()], Vec::<String>::new(), vec!["1".to_string()]]
    );
}
