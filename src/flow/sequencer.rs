//! Ordered round list and the active-round cursor

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::Round;
use crate::error::FlowError;

/// Direction for swapping a round with its neighbour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Rounds in execution order plus the cursor of a running session
#[derive(Debug, Clone, Default)]
pub struct RoundSequencer {
    rounds: Vec<Round>,
    index: usize,
    session_active: bool,
}

impl RoundSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn is_session_active(&self) -> bool {
        self.session_active
    }

    /// Index of the active round while a session runs
    pub fn current_index(&self) -> Option<usize> {
        self.session_active.then_some(self.index)
    }

    /// The active round while a session runs
    pub fn current(&self) -> Option<&Round> {
        if self.session_active {
            self.rounds.get(self.index)
        } else {
            None
        }
    }

    pub fn append(&mut self, round: Round) -> Result<(), FlowError> {
        if self.rounds.iter().any(|r| r.id == round.id) {
            return Err(FlowError::DuplicateRound(round.id));
        }
        debug!("Appending round {} ({})", round.id, round.title);
        self.rounds.push(round);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<Round, FlowError> {
        let position = self.position(id)?;
        let removed = self.rounds.remove(position);
        if self.session_active && position < self.index {
            self.index -= 1;
        }
        self.settle_cursor();
        debug!("Removed round {}", removed.id);
        Ok(removed)
    }

    /// Swap the round with its neighbour. Returns false at either end.
    pub fn move_round(&mut self, id: &str, direction: Direction) -> Result<bool, FlowError> {
        let position = self.position(id)?;
        Ok(self.swap_adjacent(position, direction))
    }

    /// Swap the round at `index` with its neighbour. Returns false at either end.
    pub fn swap_adjacent(&mut self, index: usize, direction: Direction) -> bool {
        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1),
        };
        match target {
            Some(target) if index < self.rounds.len() && target < self.rounds.len() => {
                self.rounds.swap(index, target);
                true
            }
            _ => false,
        }
    }

    /// Replace the whole list, as a template load does
    pub fn replace(&mut self, rounds: Vec<Round>) -> Result<(), FlowError> {
        let mut seen = HashSet::new();
        for round in &rounds {
            if !seen.insert(round.id.as_str()) {
                return Err(FlowError::DuplicateRound(round.id.clone()));
            }
        }
        info!("Replacing round list with {} rounds", rounds.len());
        self.rounds = rounds;
        self.settle_cursor();
        Ok(())
    }

    /// Begin a session at the first round
    pub fn start(&mut self) -> Result<&Round, FlowError> {
        if self.rounds.is_empty() {
            return Err(FlowError::EmptySequence);
        }
        self.index = 0;
        self.session_active = true;
        info!("Round session started with {} rounds", self.rounds.len());
        Ok(&self.rounds[0])
    }

    /// Step to the next round. Returns false at the last round.
    pub fn advance(&mut self) -> bool {
        if !self.session_active || self.index + 1 >= self.rounds.len() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Step to the previous round. Returns false at the first round.
    pub fn retreat(&mut self) -> bool {
        if !self.session_active || self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    fn position(&self, id: &str) -> Result<usize, FlowError> {
        self.rounds
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| FlowError::UnknownRound(id.to_string()))
    }

    /// Keep the cursor inside the list; an emptied list ends the session
    fn settle_cursor(&mut self) {
        if self.rounds.is_empty() {
            if self.session_active {
                info!("Round list emptied, ending session");
            }
            self.session_active = false;
            self.index = 0;
        } else if self.index >= self.rounds.len() {
            self.index = self.rounds.len() - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{flow::standard_template, timer::Side};

    fn three_rounds() -> RoundSequencer {
        let mut sequencer = RoundSequencer::new();
        sequencer.append(Round::normal("a", "First", 4, Side::A)).unwrap();
        sequencer.append(Round::chess("b", "Second", 3)).unwrap();
        sequencer.append(Round::normal("c", "Third", 3, Side::B)).unwrap();
        sequencer
    }

    fn ids(sequencer: &RoundSequencer) -> Vec<&str> {
        sequencer.rounds().iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn advance_clamps_at_last_round() {
        let mut sequencer = three_rounds();
        sequencer.start().unwrap();
        assert!(sequencer.advance());
        assert!(sequencer.advance());
        assert_eq!(sequencer.current_index(), Some(2));
        assert!(!sequencer.advance());
        assert_eq!(sequencer.current_index(), Some(2));
    }

    #[test]
    fn retreat_clamps_at_first_round() {
        let mut sequencer = three_rounds();
        sequencer.start().unwrap();
        assert!(!sequencer.retreat());
        sequencer.advance();
        assert!(sequencer.retreat());
        assert_eq!(sequencer.current().map(|r| r.id.as_str()), Some("a"));
    }

    #[test]
    fn start_requires_rounds_and_resets_index() {
        let mut sequencer = RoundSequencer::new();
        assert_eq!(sequencer.start().unwrap_err(), FlowError::EmptySequence);

        let mut sequencer = three_rounds();
        sequencer.start().unwrap();
        sequencer.advance();
        sequencer.start().unwrap();
        assert_eq!(sequencer.current_index(), Some(0));
    }

    #[test]
    fn cursor_is_hidden_outside_a_session() {
        let mut sequencer = three_rounds();
        assert_eq!(sequencer.current(), None);
        assert!(!sequencer.advance());
    }

    #[test]
    fn swap_adjacent_is_a_no_op_at_boundaries() {
        let mut sequencer = three_rounds();
        assert!(!sequencer.move_round("a", Direction::Up).unwrap());
        assert!(!sequencer.move_round("c", Direction::Down).unwrap());
        assert!(sequencer.move_round("a", Direction::Down).unwrap());
        assert_eq!(ids(&sequencer), vec!["b", "a", "c"]);
        assert!(sequencer.move_round("c", Direction::Up).unwrap());
        assert_eq!(ids(&sequencer), vec!["b", "c", "a"]);
    }

    #[test]
    fn duplicate_and_unknown_ids_are_rejected() {
        let mut sequencer = three_rounds();
        assert_eq!(
            sequencer.append(Round::chess("a", "Again", 2)),
            Err(FlowError::DuplicateRound("a".to_string()))
        );
        assert_eq!(
            sequencer.remove("zzz").unwrap_err(),
            FlowError::UnknownRound("zzz".to_string())
        );
        let dupes = vec![Round::chess("x", "1", 1), Round::chess("x", "2", 1)];
        assert!(sequencer.replace(dupes).is_err());
        assert_eq!(sequencer.len(), 3);
    }

    #[test]
    fn removing_an_earlier_round_keeps_the_active_round() {
        let mut sequencer = three_rounds();
        sequencer.start().unwrap();
        sequencer.advance();
        sequencer.remove("a").unwrap();
        assert_eq!(sequencer.current().map(|r| r.id.as_str()), Some("b"));
        assert_eq!(sequencer.current_index(), Some(0));
    }

    #[test]
    fn removing_the_last_round_clamps_the_cursor() {
        let mut sequencer = three_rounds();
        sequencer.start().unwrap();
        sequencer.advance();
        sequencer.advance();
        sequencer.remove("c").unwrap();
        assert_eq!(sequencer.current_index(), Some(1));
    }

    #[test]
    fn emptying_the_list_ends_the_session() {
        let mut sequencer = three_rounds();
        sequencer.start().unwrap();
        sequencer.replace(Vec::new()).unwrap();
        assert!(!sequencer.is_session_active());
        assert_eq!(sequencer.current(), None);
    }

    #[test]
    fn template_load_replaces_the_list() {
        let mut sequencer = three_rounds();
        sequencer.replace(standard_template()).unwrap();
        assert_eq!(ids(&sequencer), vec!["1", "2", "3", "4", "5"]);
    }
}
