use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use vector_bench::{Harness, HarnessConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = HarnessConfig::default();
    let guest_path = config.guest_path.clone();
    let report = Harness::new(config)
        .run()
        .await
        .with_context(|| format!("benchmark run failed (guest module {})", guest_path.display()))?;

    print!("{report}");
    Ok(())
}
