/*
    Backlog chain of unslotted ALOHA with m nodes.

    q_a = 1 - exp(-lambda / m)           (unbacklogged node transmits)
    Q_a(i, n) = Binomial(m - n, q_a)(i)
    Q_r(i, n) = Binomial(n, r)(i)

    P(n, n+i) = Q_a(i, n)                                     2 <= i <= m - n
              = Q_a(1, n) (1 - Q_r(0, n))                     i = 1
              = Q_a(1, n) Q_r(0, n) + Q_a(0, n) (1 - Q_r(1, n)) i = 0
              = Q_a(0, n) Q_r(1, n)                           i = -1

    Global balance solved by forward substitution:
    p[n] P(n, n-1) = p[n-1] (1 - P(n-1, n-1)) - sum_{j < n-1} p[j] P(j, n-1)

    The chain only steps down one state at a time, so the same balance taken
    across the cut {0..n-1} | {n..m} reads
    p[n] P(n, n-1) = sum_{j < n} p[j] sum_{k >= n} P(j, k)
    which has the cancelling terms summed out. That form is the one evaluated:
    every term is non-negative, so large m does not lose the tail to roundoff.
 */

use crate::error::{ComputeError, ConfigError};
use crate::numeric::{binomial_pmf, normalize};

/// Divisors at or below this are treated as a singular recurrence.
const SINGULAR_THRESHOLD: f64 = 1e-300;
/// Arbitrary positive seed for p[0], removed by normalization.
const SEED_P0: f64 = 0.1;

/// Validated parameters of one backlog chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PureAlohaParams {
    m: usize,
    total_arr_rate: f64,
    retrans_prob: f64,
}

impl PureAlohaParams {
    pub fn new(m: usize, total_arr_rate: f64, retrans_prob: f64) -> Result<PureAlohaParams, ConfigError> {
        if m == 0 {
            return Err(ConfigError::ZeroNodes);
        }
        if !(total_arr_rate.is_finite() && total_arr_rate >= 0.0) {
            return Err(ConfigError::InvalidArrivalRate(total_arr_rate));
        }
        if !(0.0..=1.0).contains(&retrans_prob) {
            return Err(ConfigError::ProbabilityOutOfRange {
                name: "retrans_prob",
                value: retrans_prob,
            });
        }
        Ok(PureAlohaParams {
            m,
            total_arr_rate,
            retrans_prob,
        })
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn total_arr_rate(&self) -> f64 {
        self.total_arr_rate
    }

    pub fn retrans_prob(&self) -> f64 {
        self.retrans_prob
    }
}

/// Steady-state solution of one chain.
#[derive(Debug, Clone, PartialEq)]
pub struct SteadyState {
    pub stationary: Vec<f64>,
    pub expected_backlog: f64,
    pub throughput: f64,
}

pub struct PureAloha {
    params: PureAlohaParams,
    attempt_prob: f64,
}

impl PureAloha {
    pub fn new(params: PureAlohaParams) -> PureAloha {
        let attempt_prob = 1.0 - (-params.total_arr_rate / params.m as f64).exp();
        PureAloha { params, attempt_prob }
    }

    pub fn params(&self) -> &PureAlohaParams {
        &self.params
    }

    /// Probability that an unbacklogged node transmits in a unit interval.
    pub fn attempt_probability(&self) -> f64 {
        self.attempt_prob
    }

    /// Probability that exactly `i` of the `m - n` unbacklogged nodes transmit.
    pub fn fresh_attempts(&self, i: usize, n: usize) -> f64 {
        binomial_pmf(self.params.m.saturating_sub(n), i, self.attempt_prob)
    }

    /// Probability that exactly `i` of the `n` backlogged nodes retransmit.
    pub fn backlog_attempts(&self, i: usize, n: usize) -> f64 {
        binomial_pmf(n, i, self.params.retrans_prob)
    }

    /// One-step transition probability P(n, target).
    pub fn transition_probability(&self, n: usize, target: usize) -> Result<f64, ComputeError> {
        let m = self.params.m;
        if n > m {
            return Err(ComputeError::StateOutOfRange { n, m });
        }
        if target > m {
            return Ok(0.0);
        }

        let p = if target >= n + 2 {
            self.fresh_attempts(target - n, n)
        } else if target == n + 1 {
            self.fresh_attempts(1, n) * (1.0 - self.backlog_attempts(0, n))
        } else if target == n {
            self.fresh_attempts(1, n) * self.backlog_attempts(0, n)
                + self.fresh_attempts(0, n) * (1.0 - self.backlog_attempts(1, n))
        } else if target + 1 == n {
            self.fresh_attempts(0, n) * self.backlog_attempts(1, n)
        } else {
            0.0
        };
        Ok(p)
    }

    /// Stationary distribution over backlog sizes 0..=m.
    pub fn stationary_distribution(&self) -> Result<Vec<f64>, ComputeError> {
        let m = self.params.m;
        let mut p_values = Vec::with_capacity(m + 1);
        p_values.push(SEED_P0);

        for n in 1..=m {
            let down = self.transition_probability(n, n - 1)?;
            if down.is_nan() || down <= SINGULAR_THRESHOLD {
                return Err(ComputeError::SingularTransition { n, value: down });
            }

            let mut up = 0.0;
            for (j, p_j) in p_values.iter().enumerate() {
                up += p_j * self.jump_at_least(j, n)?;
            }
            p_values.push(up / down);

            // largest entry stays at 1 so tiny divisors cannot overflow
            let peak = p_values.iter().copied().fold(0.0, f64::max);
            if peak > 1.0 {
                for v in p_values.iter_mut() {
                    *v /= peak;
                }
            }
        }

        normalize(&mut p_values);
        Ok(p_values)
    }

    /// P(j, k) summed over every k >= n.
    fn jump_at_least(&self, j: usize, n: usize) -> Result<f64, ComputeError> {
        (n..=self.params.m).map(|k| self.transition_probability(j, k)).sum()
    }

    /// Probability of exactly one transmission given backlog `n`.
    pub fn success_probability(&self, n: usize) -> f64 {
        self.fresh_attempts(1, n) * self.backlog_attempts(0, n)
            + self.fresh_attempts(0, n) * self.backlog_attempts(1, n)
    }

    pub fn expected_backlog(stationary: &[f64]) -> f64 {
        stationary.iter().enumerate().map(|(n, p)| n as f64 * p).sum()
    }

    pub fn throughput_of(&self, stationary: &[f64]) -> f64 {
        stationary
            .iter()
            .enumerate()
            .map(|(n, p)| p * self.success_probability(n))
            .sum()
    }

    pub fn throughput(&self) -> Result<f64, ComputeError> {
        Ok(self.throughput_of(&self.stationary_distribution()?))
    }

    pub fn steady_state(&self) -> Result<SteadyState, ComputeError> {
        let stationary = self.stationary_distribution()?;
        let expected_backlog = Self::expected_backlog(&stationary);
        let throughput = self.throughput_of(&stationary);
        Ok(SteadyState {
            stationary,
            expected_backlog,
            throughput,
        })
    }

    // Poisson approximation, independent of the exact chain.

    /// Attempt rate G(n) with backlog `n`.
    pub fn offered_load(&self, n: usize) -> f64 {
        (self.params.m.saturating_sub(n)) as f64 * self.attempt_prob + n as f64 * self.params.retrans_prob
    }

    pub fn success_approx(&self, n: usize) -> f64 {
        success_approx_at(self.offered_load(n))
    }

    /// Drift D(n): expected new backlog arrivals minus expected departures.
    pub fn drift(&self, n: usize) -> f64 {
        (self.params.m.saturating_sub(n)) as f64 * self.attempt_prob - self.success_approx(n)
    }
}

/// G e^{-G}.
pub fn success_approx_at(g: f64) -> f64 {
    g * (-g).exp()
}
