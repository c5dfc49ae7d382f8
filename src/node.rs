use std::fmt;
use rand::Rng;

/// Backoff state of one transmitter on the slotted channel.
///
/// A node attempts a transmission in the slot where its countdown is 0.
#[derive(Debug, Hash, Eq, Clone, Copy, PartialEq)]
pub struct ContendingNode {
    countdown: usize,
}

impl fmt::Display for ContendingNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "countdown {}", self.countdown)
    }
}

impl ContendingNode {
    pub fn with_countdown(countdown: usize) -> ContendingNode {
        ContendingNode { countdown }
    }

    pub fn get_countdown(&self) -> usize {
        self.countdown
    }

    pub fn is_attempting(&self) -> bool {
        self.countdown == 0
    }
}

/// Fresh node with a countdown drawn uniformly from `[0, window)`.
pub fn reset_countdown<R: Rng + ?Sized>(rng: &mut R, window: usize) -> ContendingNode {
    debug_assert!(window > 0);
    ContendingNode {
        countdown: rng.gen_range(0..window),
    }
}

/// One slot of waiting. Attempting nodes are left untouched, they are
/// re-drawn by the scheduler instead.
pub fn decrement(node: ContendingNode) -> ContendingNode {
    ContendingNode {
        countdown: node.countdown.saturating_sub(1),
    }
}
