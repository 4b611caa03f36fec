use geomarker::{IndexBuilder, Marker, SyncIndex};
use std::sync::Barrier;
use std::sync::Arc;
use std::thread;

#[test]
fn test_sync_index_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync + Clone>() {}
    assert_send_sync::<SyncIndex>();
}

#[test]
fn test_readers_see_consistent_snapshots() {
    let _ = env_logger::builder().is_test(true).try_init();
    let index = IndexBuilder::new().precision(6).build_sync().unwrap();
    let barrier = Arc::new(Barrier::new(5));

    let writer = {
        let index = index.clone();
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for i in 0..500 {
                let lat = 52.0 + (i % 25) as f64 * 0.002;
                let lon = 13.0 + (i / 25) as f64 * 0.002;
                index
                    .insert_marker(Marker::new(lat, lon, format!("berlin_{}", i)), 6)
                    .unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let index = index.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut last = 0;
                for _ in 0..100 {
                    let found = index.query_radius(52.02, 13.02, 20.0, 6).unwrap();
                    // Markers are only added, never removed
                    assert!(found.len() >= last);
                    assert!(found.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
                    last = found.len();
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(index.len(), 500);
    assert_eq!(index.query_radius(52.02, 13.02, 20.0, 6).unwrap().len(), 500);
}

#[test]
fn test_precision_mismatch_across_threads() {
    let index = SyncIndex::new();
    index.insert(0.0, 0.0, "first", 7).unwrap();

    let other = index.clone();
    let result = thread::spawn(move || other.insert(1.0, 1.0, "second", 5))
        .join()
        .unwrap();

    assert!(result.is_err());
    assert_eq!(index.len(), 1);
    assert_eq!(index.precision(), Some(7));
}
