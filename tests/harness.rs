use std::path::PathBuf;
use std::sync::Arc;

use vector_bench::{CollectingSink, DataSource, Harness, HarnessConfig, HarnessError};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/dot_product.wat")
}

fn config(n: usize, data: DataSource) -> HarnessConfig {
    HarnessConfig {
        n,
        layout_base: 0,
        guest_path: fixture(),
        data,
        ..HarnessConfig::default()
    }
}

#[tokio::test]
async fn test_end_to_end_small() {
    let sink = Arc::new(CollectingSink::default());
    let data = DataSource::Explicit {
        vec1: vec![1, 2, 3, 4],
        vec2: vec![5, 6, 7, 8],
    };
    let report = Harness::with_sink(config(4, data), sink.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(report.reference.result, 70);
    assert_eq!(report.candidate.result, 70);
    assert!(report.results_match());
    assert!(report.reference.timing.end >= report.reference.timing.start);
    assert!(report.candidate.timing.end >= report.candidate.timing.start);

    let text = report.to_string();
    assert!(text.starts_with("Dot product of 2, 4 dimensional i32 vectors\n"));
    assert!(text.contains("     Native: Result = 70 calculated in "));
    assert!(text.contains("WebAssembly: Result = 70 calculated in "));
    assert!(!text.contains("WARNING"));

    assert_eq!(sink.lines().len(), 2);
}

#[tokio::test]
async fn test_full_size_random_run_agrees() {
    let sink = Arc::new(CollectingSink::default());
    let data = DataSource::Random { seed: Some(2024) };
    let report = Harness::with_sink(config(16384, data), sink)
        .run()
        .await
        .unwrap();

    assert_eq!(report.n, 16384);
    assert!(report.results_match());
    assert!(report.reference.result > 0);
}

#[tokio::test]
async fn test_seeded_runs_are_reproducible() {
    let run = || async {
        let data = DataSource::Random { seed: Some(99) };
        Harness::with_sink(config(2048, data), Arc::new(CollectingSink::default()))
            .run()
            .await
            .unwrap()
    };

    let first = run().await;
    let second = run().await;
    assert_eq!(first.reference.result, second.reference.result);
    assert_eq!(first.candidate.result, second.candidate.result);
}

#[tokio::test]
async fn test_offset_layout_run() {
    let data = DataSource::Random { seed: Some(5) };
    let config = HarnessConfig {
        layout_base: 65536,
        ..config(16384, data)
    };
    let report = Harness::with_sink(config, Arc::new(CollectingSink::default()))
        .run()
        .await
        .unwrap();

    assert!(report.results_match());
}

#[tokio::test]
async fn test_missing_guest_is_fatal() {
    let config = HarnessConfig {
        guest_path: PathBuf::from("no/such/guest.wasm"),
        ..config(4, DataSource::Random { seed: Some(1) })
    };
    let err = Harness::new(config).run().await.unwrap_err();

    assert!(matches!(err, HarnessError::ModuleRead { .. }));
}

#[tokio::test]
async fn test_explicit_data_must_match_n() {
    let data = DataSource::Explicit {
        vec1: vec![1, 2],
        vec2: vec![3, 4],
    };
    let err = Harness::new(config(4, data)).run().await.unwrap_err();

    assert!(matches!(
        err,
        HarnessError::DimensionMismatch {
            expected: 4,
            actual: 2
        }
    ));
}

#[test]
fn test_default_config() {
    let config = HarnessConfig::default();

    assert_eq!(config.n, 16384);
    assert_eq!(config.layout_base, 65536);
    assert_eq!(config.data, DataSource::Random { seed: None });
    assert_eq!(config.reference_label, "Native");
    assert_eq!(config.candidate_label, "WebAssembly");
}
