use std::fmt;
use rand::Rng;
use crate::error::ConfigError;
use crate::node::{decrement, reset_countdown, ContendingNode};

/// How the backoff window of a run is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPolicy {
    /// Same window for every population size.
    Fixed(usize),
    /// Window equal to the population size N.
    PopulationSized,
}

impl WindowPolicy {
    pub fn window_for(&self, population: usize) -> usize {
        match self {
            WindowPolicy::Fixed(w) => *w,
            WindowPolicy::PopulationSized => population,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            WindowPolicy::Fixed(0) => Err(ConfigError::ZeroWindow),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for WindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowPolicy::Fixed(w) => write!(f, "W = {}", w),
            WindowPolicy::PopulationSized => write!(f, "W = N"),
        }
    }
}

/// What happens to nodes that took part in a collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Every attempting node draws a new countdown, whatever the outcome.
    ResetOnCollision,
    /// Colliding nodes are only re-drawn when more than two collide. A pair
    /// keeps countdown 0 and collides again in the next slot, forever unless a
    /// third node joins.
    ResetAboveTwo,
}

impl CollisionPolicy {
    fn resets(&self, attempts: usize) -> bool {
        match self {
            CollisionPolicy::ResetOnCollision => attempts >= 2,
            CollisionPolicy::ResetAboveTwo => attempts > 2,
        }
    }
}

impl Default for CollisionPolicy {
    fn default() -> Self {
        CollisionPolicy::ResetOnCollision
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    Idle,
    Success,
    Collision(usize),
}

impl fmt::Display for SlotOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotOutcome::Idle => write!(f, "Idle"),
            SlotOutcome::Success => write!(f, "Success"),
            SlotOutcome::Collision(k) => write!(f, "Collision of {}", k),
        }
    }
}

/// Counters of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotStats {
    pub slots: u64,
    pub successes: u64,
    pub collisions: u64,
    pub idle: u64,
}

impl SlotStats {
    /// Fraction of slots carrying exactly one attempt.
    pub fn throughput(&self) -> f64 {
        if self.slots == 0 {
            return 0.0;
        }
        self.successes as f64 / self.slots as f64
    }

    fn record(&mut self, outcome: SlotOutcome) {
        self.slots += 1;
        match outcome {
            SlotOutcome::Idle => self.idle += 1,
            SlotOutcome::Success => self.successes += 1,
            SlotOutcome::Collision(_) => self.collisions += 1,
        }
    }
}

/// Slotted ALOHA channel shared by a fixed population.
pub struct Scheduler {
    node_list: Vec<ContendingNode>,
    window: usize,
    collision: CollisionPolicy,
    attempting: Vec<usize>,
    stats: SlotStats,
}

impl Scheduler {
    pub fn new<R: Rng + ?Sized>(
        population: usize,
        window: WindowPolicy,
        collision: CollisionPolicy,
        rng: &mut R,
    ) -> Result<Scheduler, ConfigError> {
        if population == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        window.validate()?;
        let window = window.window_for(population);

        let node_list = (0..population).map(|_| reset_countdown(rng, window)).collect();

        Ok(Scheduler {
            node_list,
            window,
            collision,
            attempting: Vec::with_capacity(population),
            stats: SlotStats::default(),
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn nodes(&self) -> &[ContendingNode] {
        &self.node_list
    }

    pub fn stats(&self) -> SlotStats {
        self.stats
    }

    /// Advance the channel by one slot.
    pub fn handle_next_slot<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SlotOutcome {
        self.attempting.clear();
        for (id, node) in self.node_list.iter_mut().enumerate() {
            if node.is_attempting() {
                self.attempting.push(id);
            } else {
                *node = decrement(*node);
            }
        }

        let outcome = match self.attempting.len() {
            0 => SlotOutcome::Idle,
            1 => {
                let id = self.attempting[0];
                self.node_list[id] = reset_countdown(rng, self.window);
                SlotOutcome::Success
            }
            k => {
                if self.collision.resets(k) {
                    for &id in self.attempting.iter() {
                        self.node_list[id] = reset_countdown(rng, self.window);
                    }
                }
                SlotOutcome::Collision(k)
            }
        };

        self.stats.record(outcome);
        outcome
    }

    /// Run `slots` more slots and return the accumulated counters.
    pub fn run<R: Rng + ?Sized>(&mut self, slots: u64, rng: &mut R) -> Result<SlotStats, ConfigError> {
        if slots == 0 {
            return Err(ConfigError::ZeroSlots);
        }
        for _ in 0..slots {
            self.handle_next_slot(rng);
        }
        Ok(self.stats)
    }
}

/// One independent run: fresh nodes, `slots` slots, throughput of that run.
pub fn simulate<R: Rng + ?Sized>(
    population: usize,
    window: WindowPolicy,
    collision: CollisionPolicy,
    slots: u64,
    rng: &mut R,
) -> Result<f64, ConfigError> {
    if slots == 0 {
        return Err(ConfigError::ZeroSlots);
    }
    let mut scheduler = Scheduler::new(population, window, collision, rng)?;
    let stats = scheduler.run(slots, rng)?;
    Ok(stats.throughput())
}
