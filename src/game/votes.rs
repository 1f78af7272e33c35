use serde::{Deserialize, Serialize};

/// Tracks the vote of each player during a voting phase.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct VoteTally {
    /// Which players may vote (and be voted for) in this phase.
    eligible: Vec<bool>,
    /// The player each voter has chosen, by voter index.
    votes: Vec<Option<usize>>,
    /// Whether voting was closed before every eligible player voted.
    closed: bool,
}

/// The result of resolving a [VoteTally].
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub enum VoteOutcome {
    /// The player with the strictly highest number of votes.
    Eliminated(usize),
    /// The players sharing the highest number of votes, in roster order.
    Tie(Vec<usize>),
}

impl VoteTally {
    /// Creates an empty tally, where `eligible[i]` says whether player `i` takes part.
    pub fn new(eligible: Vec<bool>) -> Self {
        let votes = vec![None; eligible.len()];
        Self {
            eligible,
            votes,
            closed: false,
        }
    }

    /// Returns whether the given player takes part in this vote.
    pub fn is_eligible(&self, player_idx: usize) -> bool {
        self.eligible.get(player_idx).copied().unwrap_or(false)
    }

    /// Records the vote of a player, replacing any earlier vote they cast in this phase.
    /// The caller is responsible for checking that the vote is valid.
    pub fn vote(&mut self, voter: usize, target: usize) {
        self.votes[voter] = Some(target);
    }

    /// Stops accepting votes; the tally is resolved with whatever has been cast.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Returns whether voting was closed early.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns `true` once every eligible player has voted, or voting was closed.
    pub fn is_complete(&self) -> bool {
        self.closed
            || self
                .eligible
                .iter()
                .zip(&self.votes)
                .all(|(eligible, vote)| !*eligible || vote.is_some())
    }

    /// The first eligible player, in roster order, who has not voted yet.
    pub fn next_voter(&self) -> Option<usize> {
        if self.closed {
            return None;
        }
        (0..self.eligible.len()).find(|idx| self.eligible[*idx] && self.votes[*idx].is_none())
    }

    /// The number of votes received by each player.
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.eligible.len()];
        for target in self.votes.iter().flatten() {
            counts[*target] += 1;
        }
        counts
    }

    /// Gets the vote of each player.
    pub fn votes(&self) -> &[Option<usize>] {
        &self.votes
    }

    /// Decides who is eliminated. Only eligible players can be eliminated; if two or more
    /// of them share the highest count, nobody is.
    pub fn resolve(&self) -> VoteOutcome {
        let counts = self.counts();
        let max = (0..counts.len())
            .filter(|idx| self.eligible[*idx])
            .map(|idx| counts[idx])
            .max()
            .unwrap_or(0);
        let leaders: Vec<usize> = (0..counts.len())
            .filter(|idx| self.eligible[*idx] && counts[*idx] == max)
            .collect();
        match leaders[..] {
            [player] => VoteOutcome::Eliminated(player),
            _ => VoteOutcome::Tie(leaders),
        }
    }
}
