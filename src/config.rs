use std::ops::RangeInclusive;
use crate::error::ConfigError;
use crate::scheduler::{CollisionPolicy, WindowPolicy};

pub const TSLOTS: u64 = 10_000;
pub const MAX_POPULATION: usize = 100;
pub const BACKLOG_NODES: usize = 10;

/// Slotted simulation sweep: one curve per window, one point per population size.
#[derive(Debug, Clone, PartialEq)]
pub struct SlottedConfig {
    pub slots: u64,
    pub population: RangeInclusive<usize>,
    pub windows: Vec<WindowPolicy>,
    pub collision: CollisionPolicy,
}

impl Default for SlottedConfig {
    fn default() -> Self {
        SlottedConfig {
            slots: TSLOTS,
            population: 1..=MAX_POPULATION,
            windows: vec![WindowPolicy::Fixed(3), WindowPolicy::Fixed(100)],
            collision: CollisionPolicy::default(),
        }
    }
}

impl SlottedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slots == 0 {
            return Err(ConfigError::ZeroSlots);
        }
        if *self.population.start() == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if self.population.is_empty() {
            return Err(ConfigError::EmptyPopulationRange {
                start: *self.population.start(),
                end: *self.population.end(),
            });
        }
        if self.windows.is_empty() {
            return Err(ConfigError::NoWindows);
        }
        self.windows.iter().try_for_each(|w| w.validate())
    }
}

/// Evenly spaced total arrival rates `start, start + step, ...`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrivalSweep {
    pub start: f64,
    pub step: f64,
    pub points: usize,
}

impl Default for ArrivalSweep {
    fn default() -> Self {
        ArrivalSweep {
            start: 0.01,
            step: 0.01,
            points: 100,
        }
    }
}

impl ArrivalSweep {
    pub fn rates(&self) -> Vec<f64> {
        // multiply rather than accumulate so the last point stays on the grid
        (0..self.points).map(|k| self.start + self.step * k as f64).collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_start = self.start.is_finite() && self.start >= 0.0;
        let valid_step = self.step.is_finite() && self.step > 0.0;
        if !valid_start || !valid_step || self.points == 0 {
            return Err(ConfigError::InvalidArrivalSweep);
        }
        Ok(())
    }
}

/// Backlog chain sweep: one curve per retransmission probability.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkovConfig {
    pub m: usize,
    pub retrans_probs: Vec<f64>,
    pub arrival: ArrivalSweep,
}

impl Default for MarkovConfig {
    fn default() -> Self {
        MarkovConfig {
            m: BACKLOG_NODES,
            retrans_probs: vec![0.05, 0.2, 0.3, 0.5],
            arrival: ArrivalSweep::default(),
        }
    }
}

impl MarkovConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.m == 0 {
            return Err(ConfigError::ZeroNodes);
        }
        if self.retrans_probs.is_empty() {
            return Err(ConfigError::NoRetransmissionProbabilities);
        }
        if let Some(&bad) = self.retrans_probs.iter().find(|r| !(0.0..=1.0).contains(*r)) {
            return Err(ConfigError::ProbabilityOutOfRange {
                name: "retrans_prob",
                value: bad,
            });
        }
        self.arrival.validate()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperimentConfig {
    pub slotted: SlottedConfig,
    pub markov: MarkovConfig,
    /// Base seed of the per-point generators; `None` draws one from entropy.
    pub seed: Option<u64>,
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.slotted.validate()?;
        self.markov.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ExperimentConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.slotted.slots, 10_000);
        assert_eq!(config.slotted.population.clone().count(), 100);
        assert_eq!(config.markov.retrans_probs, vec![0.05, 0.2, 0.3, 0.5]);
    }

    #[test]
    fn arrival_rates_span_the_grid() {
        let rates = ArrivalSweep::default().rates();
        assert_eq!(rates.len(), 100);
        assert!((rates[0] - 0.01).abs() < 1e-12);
        assert!((rates[99] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn slotted_errors() {
        let mut config = SlottedConfig::default();
        config.slots = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroSlots));

        let mut config = SlottedConfig::default();
        config.population = 0..=10;
        assert_eq!(config.validate(), Err(ConfigError::ZeroPopulation));

        let mut config = SlottedConfig::default();
        config.population = 10..=5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyPopulationRange { start: 10, end: 5 })
        );

        let mut config = SlottedConfig::default();
        config.windows = vec![WindowPolicy::PopulationSized, WindowPolicy::Fixed(0)];
        assert_eq!(config.validate(), Err(ConfigError::ZeroWindow));

        let mut config = SlottedConfig::default();
        config.windows.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoWindows));
    }

    #[test]
    fn markov_errors() {
        let mut config = MarkovConfig::default();
        config.m = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroNodes));

        let mut config = MarkovConfig::default();
        config.retrans_probs.push(-0.1);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ProbabilityOutOfRange { name: "retrans_prob", value: -0.1 })
        );

        let mut config = MarkovConfig::default();
        config.retrans_probs.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoRetransmissionProbabilities));

        let mut config = MarkovConfig::default();
        config.arrival.step = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidArrivalSweep));

        let mut config = MarkovConfig::default();
        config.arrival.start = -0.01;
        assert_eq!(config.validate(), Err(ConfigError::InvalidArrivalSweep));
    }

    #[test]
    fn zero_load_is_a_valid_start() {
        let mut config = MarkovConfig::default();
        config.arrival.start = 0.0;
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.arrival.rates()[0], 0.0);
    }
}
