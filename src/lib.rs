//! Throughput of ALOHA random access under contention.
//!
//! Two independent experiments share this crate:
//! - [`scheduler`]: Monte Carlo simulation of slotted ALOHA, a population of
//!   nodes each counting down a random backoff.
//! - [`theoretical`]: steady state of the backlog Markov chain of unslotted
//!   ALOHA, solved exactly by forward substitution.
//!
//! [`sweep`] runs both over their parameter grids and hands back labelled
//! [`series::Series`] for plotting.

pub mod config;
pub mod error;
pub mod node;
pub mod numeric;
pub mod scheduler;
pub mod series;
pub mod sweep;
pub mod theoretical;

pub use config::{ArrivalSweep, ExperimentConfig, MarkovConfig, SlottedConfig};
pub use error::{AlohaError, ComputeError, ConfigError};
pub use scheduler::{simulate, CollisionPolicy, Scheduler, SlotStats, WindowPolicy};
pub use series::Series;
pub use sweep::{run_experiments, sweep_markov, sweep_slotted, Experiments, MarkovMetric};
pub use theoretical::{PureAloha, PureAlohaParams, SteadyState};
