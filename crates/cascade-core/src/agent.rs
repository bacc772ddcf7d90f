//! Agent State Machine
//!
//! One agent per node of the follow-graph. An agent tracks its attitude
//! toward the meme and how often it has seen the meme and the fact-check.
//! The only transitions are `Unaware -> Believer`, `Unaware -> Disbeliever`
//! and `Believer -> Disbeliever`; disbelievers never change their mind.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::adoption::SpreadParams;

/// An agent's belief state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Attitude {
    #[default]
    Unaware,
    Believer,
    Disbeliever,
}

impl Attitude {
    /// The content an agent with this attitude broadcasts, if any.
    pub fn as_stimulus(self) -> Option<Stimulus> {
        match self {
            Attitude::Unaware => None,
            Attitude::Believer => Some(Stimulus::Meme),
            Attitude::Disbeliever => Some(Stimulus::FactCheck),
        }
    }
}

/// The kind of content delivered by one exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stimulus {
    Meme,
    FactCheck,
}

impl Stimulus {
    /// The attitude an agent adopts when it accepts this content at face
    /// value.
    pub fn adopted_attitude(self) -> Attitude {
        match self {
            Stimulus::Meme => Attitude::Believer,
            Stimulus::FactCheck => Attitude::Disbeliever,
        }
    }
}

/// One node in the social graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: usize,
    pub attitude: Attitude,
    pub times_seen_meme: u32,
    pub times_seen_factcheck: u32,
}

impl Agent {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            attitude: Attitude::Unaware,
            times_seen_meme: 0,
            times_seen_factcheck: 0,
        }
    }

    /// Deliver one exposure to this agent.
    ///
    /// The matching exposure counter is incremented whether or not the
    /// attitude changes. Returns the content the agent re-shares, or `None`
    /// if it stays quiet. An agent that already holds the delivered attitude,
    /// or that has become a disbeliever, never re-shares.
    ///
    /// A re-sharing agent rolls `fact_check_probability` once more: on
    /// success it fact-checks and turns disbeliever regardless of what it
    /// just saw (for a fact-check stimulus the outcome is the same either
    /// way).
    pub fn observe<R: Rng>(
        &mut self,
        stimulus: Stimulus,
        params: &SpreadParams,
        rng: &mut R,
    ) -> Option<Stimulus> {
        let exposures = match stimulus {
            Stimulus::Meme => {
                self.times_seen_meme += 1;
                self.times_seen_meme
            }
            Stimulus::FactCheck => {
                self.times_seen_factcheck += 1;
                self.times_seen_factcheck
            }
        };

        if self.attitude == stimulus.adopted_attitude() || self.attitude == Attitude::Disbeliever {
            return None;
        }

        if rng.gen::<f64>() >= params.adoption.probability(exposures) {
            // Exposed, but not moved to act.
            return None;
        }

        self.attitude = if rng.gen::<f64>() < params.fact_check_probability {
            Attitude::Disbeliever
        } else {
            stimulus.adopted_attitude()
        };
        self.attitude.as_stimulus()
    }
}
