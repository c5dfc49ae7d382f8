use aloha_sim::{run_experiments, ExperimentConfig};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_level(true)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    tracing::info!("... ALOHA simulator is started ...");

    let config = ExperimentConfig::default();
    let experiments = run_experiments(&config).map_err(|e| {
        tracing::error!(err = %e);
        e
    })?;

    println!("******************* Slotted ALOHA, throughput vs nodes *******************");
    for series in experiments.slotted.iter() {
        print!("{}", series);
    }
    println!("******************* Unslotted ALOHA, throughput vs load (m = {}) *******************", config.markov.m);
    for series in experiments.throughput.iter() {
        print!("{}", series);
    }
    println!("seed: {}", experiments.seed);
    Ok(())
}
