use super::*;
use crate::embedding::{CountingFactory, FailingFactory, SentenceConfig};

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

fn snapshot_config(dir: &TempDir) -> CacheConfig {
    CacheConfig::new(dir.path().join("embeddings.rkyv"))
}

fn counting_cache(config: CacheConfig) -> (EmbeddingCache, CountingFactory) {
    let factory = CountingFactory::new().unwrap();
    let cache = EmbeddingCache::new(config, LazyEmbedder::new(factory.clone()));
    (cache, factory)
}

mod lookup_tests {
    use super::*;

    #[test]
    fn test_miss_then_hit() {
        let dir = TempDir::new().unwrap();
        let (cache, factory) = counting_cache(snapshot_config(&dir));

        let first = cache.get_or_compute("C-1", "gantry stuck at 90 degrees").unwrap();
        let second = cache.get_or_compute("C-1", "gantry stuck at 90 degrees").unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 384);
        assert_eq!(factory.builds(), 1);
        assert_eq!(factory.inference_calls(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_hit_ignores_new_text() {
        let dir = TempDir::new().unwrap();
        let (cache, factory) = counting_cache(snapshot_config(&dir));

        let original = cache.get_or_compute("C-1", "couch drift").unwrap();
        let again = cache.get_or_compute("C-1", "completely different text").unwrap();

        assert_eq!(original, again);
        assert_eq!(factory.inference_calls(), 1);
    }

    #[test]
    fn test_blank_text_yields_zero_vector_without_model() {
        let dir = TempDir::new().unwrap();
        let (cache, factory) = counting_cache(snapshot_config(&dir));

        let vector = cache.get_or_compute("C-blank", "  \n\t ").unwrap();

        assert_eq!(vector, vec![0.0; 384]);
        assert_eq!(factory.builds(), 0);
        assert!(!cache.embedder_initialized());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_model_failure_is_feature_unavailable_and_retried() {
        let dir = TempDir::new().unwrap();
        let factory = FailingFactory::new();
        let cache = EmbeddingCache::new(
            snapshot_config(&dir),
            LazyEmbedder::new(factory.clone()),
        );

        let err = cache.get_or_compute("C-1", "tube arc").unwrap_err();
        assert!(matches!(err, CacheError::FeatureUnavailable { .. }));
        assert!(cache.get_or_compute("C-1", "tube arc").is_err());
        assert_eq!(factory.attempts(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_first_use_runs_inference_once() {
        let dir = TempDir::new().unwrap();
        let factory = CountingFactory::with_delay(Duration::from_millis(25)).unwrap();
        let cache = Arc::new(EmbeddingCache::new(
            snapshot_config(&dir),
            LazyEmbedder::new(factory.clone()),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get_or_compute("C-7", "detector ghosting").unwrap())
            })
            .collect();

        let vectors: Vec<Vec<f32>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(factory.builds(), 1);
        assert_eq!(factory.inference_calls(), 1);
        assert!(vectors.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_hit_waits_behind_in_flight_miss() {
        let dir = TempDir::new().unwrap();
        let factory = CountingFactory::with_delay(Duration::from_millis(200)).unwrap();
        let cache = Arc::new(EmbeddingCache::new(
            snapshot_config(&dir),
            LazyEmbedder::new(factory.clone()),
        ));
        cache.get_or_compute("C-1", "gantry noise").unwrap();

        let slow = {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.get_or_compute("C-2", "couch drift").unwrap())
        };
        thread::sleep(Duration::from_millis(50));

        let started = std::time::Instant::now();
        cache.get_or_compute("C-1", "gantry noise").unwrap();
        assert!(started.elapsed() >= Duration::from_millis(100));

        slow.join().unwrap();
        assert_eq!(factory.inference_calls(), 2);
    }
}

mod staleness_tests {
    use super::*;

    #[test]
    fn test_invalidate_forces_recompute() {
        let dir = TempDir::new().unwrap();
        let (cache, factory) = counting_cache(snapshot_config(&dir));

        cache.get_or_compute("C-1", "old text").unwrap();
        assert!(cache.invalidate("C-1"));
        assert!(!cache.invalidate("C-1"));
        assert!(!cache.contains("C-1"));

        cache.get_or_compute("C-1", "new text").unwrap();
        assert_eq!(factory.inference_calls(), 2);
    }

    #[test]
    fn test_is_stale() {
        let dir = TempDir::new().unwrap();
        let (cache, _factory) = counting_cache(snapshot_config(&dir));

        assert_eq!(cache.is_stale("C-1", "anything"), None);

        cache.get_or_compute("C-1", "couch noise").unwrap();
        assert_eq!(cache.is_stale("C-1", "couch noise"), Some(false));
        assert_eq!(cache.is_stale("C-1", "couch noise, loud"), Some(true));
    }
}

mod persistence_tests {
    use super::*;

    #[test]
    fn test_save_then_load_skips_model() {
        let dir = TempDir::new().unwrap();
        let (cache, _factory) = counting_cache(snapshot_config(&dir));
        let vector = cache.get_or_compute("C-1", "gantry collision").unwrap();
        cache.get_or_compute("C-2", "software freeze").unwrap();
        assert_eq!(cache.save().unwrap(), 2);

        let (fresh, fresh_factory) = counting_cache(snapshot_config(&dir));
        assert_eq!(fresh.load(), 2);

        let restored = fresh.get_or_compute("C-1", "gantry collision").unwrap();
        assert_eq!(restored, vector);
        assert_eq!(fresh_factory.builds(), 0);
        assert_eq!(fresh_factory.inference_calls(), 0);
        assert_eq!(fresh.is_stale("C-1", "gantry collision"), Some(false));
    }

    #[test]
    fn test_load_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let (cache, _factory) = counting_cache(snapshot_config(&dir));
        assert_eq!(cache.load(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let config = snapshot_config(&dir);
        std::fs::write(&config.snapshot_path, b"definitely not an rkyv archive").unwrap();

        let (cache, _factory) = counting_cache(config);
        assert_eq!(cache.load(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_load_empty_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let config = snapshot_config(&dir);
        std::fs::write(&config.snapshot_path, b"").unwrap();

        assert!(matches!(
            read_snapshot(&config.snapshot_path, config.embedding_dim),
            Err(CacheError::InvalidSnapshot(_))
        ));
        let (cache, _factory) = counting_cache(config);
        assert_eq!(cache.load(), 0);
    }

    #[test]
    fn test_load_drops_wrong_dimension_entries() {
        let dir = TempDir::new().unwrap();
        let config = snapshot_config(&dir);
        let snapshot = EmbeddingSnapshot {
            version: crate::constants::SNAPSHOT_VERSION,
            embedding_dim: 384,
            entries: vec![
                SnapshotEntry {
                    id: "good".to_string(),
                    fingerprint: fingerprint_text("good"),
                    vector: vec![0.5; 384],
                },
                SnapshotEntry {
                    id: "short".to_string(),
                    fingerprint: fingerprint_text("short"),
                    vector: vec![0.5; 3],
                },
            ],
        };
        write_snapshot(&config.snapshot_path, &snapshot).unwrap();

        let (cache, _factory) = counting_cache(config);
        assert_eq!(cache.load(), 1);
        assert!(cache.contains("good"));
        assert!(!cache.contains("short"));
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let config = snapshot_config(&dir);
        let snapshot = EmbeddingSnapshot {
            version: 99,
            embedding_dim: 384,
            entries: Vec::new(),
        };
        write_snapshot(&config.snapshot_path, &snapshot).unwrap();

        assert!(matches!(
            read_snapshot(&config.snapshot_path, config.embedding_dim),
            Err(CacheError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_dimension_header_mismatch_is_rejected() {
        let dir = TempDir::new().unwrap();
        let config = snapshot_config(&dir);
        let snapshot = EmbeddingSnapshot {
            version: crate::constants::SNAPSHOT_VERSION,
            embedding_dim: 768,
            entries: vec![SnapshotEntry {
                id: "wide".to_string(),
                fingerprint: fingerprint_text("wide"),
                vector: vec![0.5; 768],
            }],
        };
        write_snapshot(&config.snapshot_path, &snapshot).unwrap();

        assert!(matches!(
            read_snapshot(&config.snapshot_path, config.embedding_dim),
            Err(CacheError::InvalidSnapshot(_))
        ));
        assert!(read_snapshot(&config.snapshot_path, 768).unwrap().is_some());

        let (cache, factory) = counting_cache(config);
        assert_eq!(cache.load(), 0);
        assert!(cache.is_empty());
        assert_eq!(factory.builds(), 0);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let config = CacheConfig::new(dir.path().join("nested/deeper/embeddings.rkyv"));
        let (cache, _factory) = counting_cache(config.clone());

        cache.get_or_compute("C-1", "couch").unwrap();
        cache.save().unwrap();
        assert!(config.snapshot_path.is_file());
    }
}

mod worker_tests {
    use super::*;

    async fn wait_for_file(path: &std::path::Path) -> bool {
        for _ in 0..100 {
            if path.is_file() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }

    #[test]
    fn test_request_without_worker_is_noop() {
        let dir = TempDir::new().unwrap();
        let (cache, _factory) = counting_cache(snapshot_config(&dir));
        assert!(!cache.request_snapshot());
    }

    #[tokio::test]
    async fn test_every_nth_insert_requests_snapshot() {
        let dir = TempDir::new().unwrap();
        let config = snapshot_config(&dir).with_snapshot_every(3);
        let path = config.snapshot_path.clone();
        let (cache, _factory) = counting_cache(config);
        let cache = Arc::new(cache);
        let worker = SnapshotWorker::spawn(Arc::clone(&cache));

        cache.get_or_compute("C-1", "one").unwrap();
        cache.get_or_compute("C-2", "two").unwrap();
        assert!(!path.exists());

        cache.get_or_compute("C-3", "three").unwrap();
        assert!(wait_for_file(&path).await);

        assert_eq!(worker.shutdown().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_shutdown_writes_final_snapshot() {
        let dir = TempDir::new().unwrap();
        let config = snapshot_config(&dir);
        let (cache, _factory) = counting_cache(config.clone());
        let cache = Arc::new(cache);
        let worker = SnapshotWorker::spawn(Arc::clone(&cache));

        cache.get_or_compute("C-1", "gantry").unwrap();
        cache.get_or_compute("C-2", "couch").unwrap();
        assert!(!worker.is_finished());

        assert_eq!(worker.shutdown().await.unwrap(), 2);
        assert!(!cache.request_snapshot());

        let restored = EmbeddingCache::new(
            config,
            LazyEmbedder::new(SentenceConfig::stub()),
        );
        assert_eq!(restored.load(), 2);
    }
}
