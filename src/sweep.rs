//! Sweep drivers.
//!
//! Every sweep point is an independent run, so points are mapped in parallel
//! with rayon and collected back in sweep order. Each slotted point owns a
//! generator seeded from the base seed and its position, which keeps results
//! independent of thread scheduling.
//!
//! A failing point aborts the whole sweep with that point's error.

use std::fmt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::{ExperimentConfig, MarkovConfig, SlottedConfig};
use crate::error::AlohaError;
use crate::scheduler::simulate;
use crate::series::Series;
use crate::theoretical::{PureAloha, PureAlohaParams};

/// Seed of the generator for point `point` of curve `curve`.
pub fn point_seed(base: u64, curve: usize, point: usize) -> u64 {
    const GOLDEN: u64 = 0x9E37_79B9_7F4A_7C15;
    base ^ (curve as u64).wrapping_add(1).wrapping_mul(GOLDEN).rotate_left(32)
        ^ (point as u64).wrapping_add(1).wrapping_mul(GOLDEN)
}

/// One throughput curve per window policy, over the population range.
pub fn sweep_slotted(config: &SlottedConfig, seed: u64) -> Result<Vec<Series>, AlohaError> {
    config.validate()?;

    let mut curves = Vec::with_capacity(config.windows.len());
    for (curve, &window) in config.windows.iter().enumerate() {
        info!("Window size: {}", window);

        let points = config
            .population
            .clone()
            .into_par_iter()
            .map(|population| -> Result<(f64, f64), AlohaError> {
                let mut rng = StdRng::seed_from_u64(point_seed(seed, curve, population));
                let throughput = simulate(population, window, config.collision, config.slots, &mut rng)?;
                Ok((population as f64, throughput))
            })
            .collect::<Result<Vec<_>, AlohaError>>()?;

        for (population, throughput) in points.iter() {
            info!("N = {:3}: {:.6}", population, throughput);
        }
        curves.push(Series::new(window.to_string(), points));
    }
    Ok(curves)
}

/// Which quantity a backlog-chain curve carries on its y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkovMetric {
    Throughput,
    ExpectedBacklog,
}

impl fmt::Display for MarkovMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkovMetric::Throughput => write!(f, "throughput"),
            MarkovMetric::ExpectedBacklog => write!(f, "expected backlog"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkovPoint {
    pub total_arr_rate: f64,
    pub throughput: f64,
    pub expected_backlog: f64,
}

impl MarkovPoint {
    pub fn metric(&self, metric: MarkovMetric) -> f64 {
        match metric {
            MarkovMetric::Throughput => self.throughput,
            MarkovMetric::ExpectedBacklog => self.expected_backlog,
        }
    }
}

/// Steady-state points of one retransmission probability over the arrival sweep.
pub fn markov_curve(m: usize, retrans_prob: f64, rates: &[f64]) -> Result<Vec<MarkovPoint>, AlohaError> {
    rates
        .par_iter()
        .map(|&total_arr_rate| -> Result<MarkovPoint, AlohaError> {
            let params = PureAlohaParams::new(m, total_arr_rate, retrans_prob)?;
            let aloha = PureAloha::new(params);
            let state = aloha.steady_state()?;
            debug!(
                m = aloha.params().m(),
                total_arr_rate = aloha.params().total_arr_rate(),
                retrans_prob = aloha.params().retrans_prob(),
                throughput = state.throughput,
                "steady state"
            );
            Ok(MarkovPoint {
                total_arr_rate,
                throughput: state.throughput,
                expected_backlog: state.expected_backlog,
            })
        })
        .collect()
}

/// Every curve of the backlog-chain sweep, keyed by retransmission probability.
pub fn markov_curves(config: &MarkovConfig) -> Result<Vec<(f64, Vec<MarkovPoint>)>, AlohaError> {
    config.validate()?;

    let rates = config.arrival.rates();
    let mut curves = Vec::with_capacity(config.retrans_probs.len());
    for &retrans_prob in config.retrans_probs.iter() {
        let points = markov_curve(config.m, retrans_prob, &rates)?;
        if let Some(best) = points.iter().max_by(|a, b| a.throughput.total_cmp(&b.throughput)) {
            info!(
                "retrans_prob = {}: peak throughput {:.4} at load {:.2}",
                retrans_prob, best.throughput, best.total_arr_rate
            );
        }
        curves.push((retrans_prob, points));
    }
    Ok(curves)
}

/// Curves of `metric` against total load, one per retransmission probability.
pub fn sweep_markov(config: &MarkovConfig, metric: MarkovMetric) -> Result<Vec<Series>, AlohaError> {
    Ok(markov_curves(config)?
        .into_iter()
        .map(|(retrans_prob, points)| to_series(retrans_prob, &points, metric))
        .collect())
}

fn to_series(retrans_prob: f64, points: &[MarkovPoint], metric: MarkovMetric) -> Series {
    Series::new(
        format!("retrans_prob = {}", retrans_prob),
        points.iter().map(|p| (p.total_arr_rate, p.metric(metric))).collect(),
    )
}

/// Output of both experiments.
#[derive(Debug, Clone, PartialEq)]
pub struct Experiments {
    pub seed: u64,
    pub slotted: Vec<Series>,
    pub throughput: Vec<Series>,
    pub backlog: Vec<Series>,
}

pub fn run_experiments(config: &ExperimentConfig) -> Result<Experiments, AlohaError> {
    config.validate()?;
    let seed = config.seed.unwrap_or_else(rand::random);
    info!(seed, "starting sweeps");

    let slotted = sweep_slotted(&config.slotted, seed)?;

    let curves = markov_curves(&config.markov)?;
    let throughput = curves
        .iter()
        .map(|(r, points)| to_series(*r, points, MarkovMetric::Throughput))
        .collect();
    let backlog = curves
        .iter()
        .map(|(r, points)| to_series(*r, points, MarkovMetric::ExpectedBacklog))
        .collect();

    Ok(Experiments {
        seed,
        slotted,
        throughput,
        backlog,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArrivalSweep;
    use crate::error::{ComputeError, ConfigError};
    use crate::scheduler::WindowPolicy;

    fn small_slotted() -> SlottedConfig {
        SlottedConfig {
            slots: 2_000,
            population: 1..=12,
            windows: vec![WindowPolicy::Fixed(3), WindowPolicy::PopulationSized],
            ..SlottedConfig::default()
        }
    }

    #[test]
    fn point_seeds_differ() {
        let a = point_seed(1, 0, 1);
        assert_ne!(a, point_seed(1, 0, 2));
        assert_ne!(a, point_seed(1, 1, 1));
        assert_ne!(a, point_seed(2, 0, 1));
    }

    #[test]
    fn slotted_curves_are_ordered_and_labelled() {
        let curves = sweep_slotted(&small_slotted(), 42).unwrap();
        assert_eq!(curves.len(), 2);
        assert_eq!(curves[0].label, "W = 3");
        assert_eq!(curves[1].label, "W = N");
        for curve in curves.iter() {
            let xs: Vec<f64> = curve.xs().collect();
            assert_eq!(xs, (1..=12).map(|n| n as f64).collect::<Vec<_>>());
            assert!(curve.ys().all(|y| (0.0..=1.0).contains(&y)));
        }
        // single node, window 1
        assert_eq!(curves[1].points[0].1, 1.0);
    }

    #[test]
    fn slotted_sweep_is_reproducible() {
        let config = small_slotted();
        assert_eq!(sweep_slotted(&config, 9).unwrap(), sweep_slotted(&config, 9).unwrap());
    }

    #[test]
    fn slotted_sweep_rejects_bad_config() {
        let mut config = small_slotted();
        config.windows.push(WindowPolicy::Fixed(0));
        assert_eq!(
            sweep_slotted(&config, 0),
            Err(AlohaError::Config(ConfigError::ZeroWindow))
        );
    }

    #[test]
    fn markov_sweep_shapes() {
        let config = MarkovConfig {
            arrival: ArrivalSweep {
                start: 0.1,
                step: 0.1,
                points: 10,
            },
            ..MarkovConfig::default()
        };
        let throughput = sweep_markov(&config, MarkovMetric::Throughput).unwrap();
        let backlog = sweep_markov(&config, MarkovMetric::ExpectedBacklog).unwrap();
        assert_eq!(throughput.len(), 4);
        assert_eq!(throughput[0].label, "retrans_prob = 0.05");
        for (t, b) in throughput.iter().zip(backlog.iter()) {
            assert_eq!(t.len(), 10);
            assert!(t.ys().all(|y| (0.0..=1.0).contains(&y)));
            assert!(b.ys().all(|y| (0.0..=10.0).contains(&y)));
        }
        // backlog grows with load
        let b = &backlog[3];
        assert!(b.points[9].1 > b.points[0].1);
    }

    #[test]
    fn markov_sweep_aborts_on_singular_point() {
        let config = MarkovConfig {
            retrans_probs: vec![0.2, 0.0],
            ..MarkovConfig::default()
        };
        assert!(matches!(
            sweep_markov(&config, MarkovMetric::Throughput),
            Err(AlohaError::Compute(ComputeError::SingularTransition { n: 1, .. }))
        ));
    }
}
