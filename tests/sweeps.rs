use aloha_sim::{
    run_experiments, AlohaError, ConfigError, ExperimentConfig, SlottedConfig, WindowPolicy,
};

#[test]
fn default_experiments_end_to_end() {
    let config = ExperimentConfig {
        seed: Some(2024),
        ..ExperimentConfig::default()
    };
    let experiments = run_experiments(&config).unwrap();
    assert_eq!(experiments.seed, 2024);

    assert_eq!(experiments.slotted.len(), 2);
    for series in experiments.slotted.iter() {
        assert_eq!(series.len(), 100);
        assert!(series.ys().all(|y| (0.0..=1.0).contains(&y)));
    }

    // W = 3 collapses once the population outgrows the window
    let narrow = &experiments.slotted[0];
    assert!(narrow.points[2].1 > 0.3);
    assert!(narrow.points[49].1 < 0.01);

    // W = 100 peaks somewhere in the middle of the population range
    let (peak_n, peak) = experiments.slotted[1].peak().unwrap();
    assert!(peak > 0.3 && peak < 0.45, "peak {} at N = {}", peak, peak_n);
    assert!(peak_n > 20.0 && peak_n < 80.0, "peak at N = {}", peak_n);

    assert_eq!(experiments.throughput.len(), 4);
    assert_eq!(experiments.backlog.len(), 4);
    for series in experiments.throughput.iter() {
        assert_eq!(series.len(), 100);
        let (x0, y0) = series.points[0];
        assert!((x0 - 0.01).abs() < 1e-12);
        assert!(y0 / x0 > 0.9);
    }
}

#[test]
fn invalid_config_fails_before_running() {
    let config = ExperimentConfig {
        slotted: SlottedConfig {
            windows: vec![WindowPolicy::Fixed(0)],
            ..SlottedConfig::default()
        },
        seed: Some(1),
        ..ExperimentConfig::default()
    };
    assert_eq!(
        run_experiments(&config),
        Err(AlohaError::Config(ConfigError::ZeroWindow))
    );
}
