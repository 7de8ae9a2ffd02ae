//! Boat crossings: enumerating crews, applying them, and describing the
//! step between two consecutive states.
//!
//! Crews are enumerated by size ascending and then lexicographically over
//! the boat bank's occupants in [`Person`] order. The search relies on
//! this order being stable so repeated runs return the same path.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::puzzle::{Person, PuzzleConfig, Side};
use crate::rules::is_state_safe;
use crate::state::State;

/// Who crosses, and from which bank
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub crew: SmallVec<[Person; 4]>,
    pub from: Side,
}

impl Move {
    pub fn to(&self) -> Side {
        self.from.opposite()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, person) in self.crew.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", person)?;
        }
        write!(f, " {}", self.from.arrow())
    }
}

/// Call `visit` with every k-subset of `items`, in lexicographic order.
fn for_each_combination<F>(items: &[Person], k: usize, mut visit: F)
where
    F: FnMut(&[Person]),
{
    let n = items.len();
    if k == 0 || k > n {
        return;
    }

    let mut indices: SmallVec<[usize; 4]> = (0..k).collect();
    let mut chosen: SmallVec<[Person; 4]> = SmallVec::with_capacity(k);
    loop {
        chosen.clear();
        chosen.extend(indices.iter().map(|&i| items[i]));
        visit(&chosen);

        // Advance the rightmost index that still has room
        let mut pos = k;
        while pos > 0 && indices[pos - 1] == n - k + (pos - 1) {
            pos -= 1;
        }
        if pos == 0 {
            return;
        }
        indices[pos - 1] += 1;
        for j in pos..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}

/// Every crew that may leave the boat bank, safe or not.
///
/// A crew holds between one and `boat_capacity` people and contains at
/// least one operator. An empty boat bank yields no moves.
pub fn candidate_moves(state: &State, config: &PuzzleConfig) -> Vec<Move> {
    let occupants = state.boat_bank().as_slice();
    let mut moves = Vec::new();

    for size in 1..=config.boat_capacity.min(occupants.len()) {
        for_each_combination(occupants, size, |crew| {
            if crew.iter().any(Person::is_operator) {
                moves.push(Move {
                    crew: SmallVec::from_slice(crew),
                    from: state.boat_side,
                });
            }
        });
    }

    moves
}

/// Ferry the crew across. The caller guarantees the crew is on the boat
/// bank.
pub fn apply(state: &State, mv: &Move) -> State {
    let mut next = state.clone();
    for person in &mv.crew {
        match mv.from {
            Side::Left => {
                next.left_bank.remove(person);
                next.right_bank.insert(*person);
            }
            Side::Right => {
                next.right_bank.remove(person);
                next.left_bank.insert(*person);
            }
        }
    }
    next.boat_side = mv.to();
    next
}

/// Legal moves paired with the state each one leads to.
pub fn legal_moves(state: &State, config: &PuzzleConfig) -> Vec<(Move, State)> {
    candidate_moves(state, config)
        .into_iter()
        .filter_map(|mv| {
            let next = apply(state, &mv);
            is_state_safe(&next, &config.rules).then_some((mv, next))
        })
        .collect()
}

/// Successor states in enumeration order
pub fn generate_successors(state: &State, config: &PuzzleConfig) -> Vec<State> {
    legal_moves(state, config)
        .into_iter()
        .map(|(_, next)| next)
        .collect()
}

/// What happened between two consecutive states on a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub step: usize,
    pub crossing: Move,
}

impl Transition {
    /// Recover the crossing that turns `from` into `to`. Returns `None` if
    /// the two states are not one boat trip apart.
    pub fn between(step: usize, from: &State, to: &State) -> Option<Self> {
        if from.boat_side == to.boat_side {
            return None;
        }

        let crew: SmallVec<[Person; 4]> = from
            .boat_bank()
            .iter()
            .filter(|p| to.bank(from.boat_side.opposite()).contains(p))
            .copied()
            .collect();

        let expected = from.boat_bank().len() - crew.len();
        if crew.is_empty() || to.bank(from.boat_side).len() != expected {
            return None;
        }

        Some(Self {
            step,
            crossing: Move {
                crew,
                from: from.boat_side,
            },
        })
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.step, self.crossing)
    }
}

/// Crossings along a path, numbered from 1
pub fn transitions(path: &[State]) -> Vec<Transition> {
    path.windows(2)
        .enumerate()
        .filter_map(|(i, pair)| Transition::between(i + 1, &pair[0], &pair[1]))
        .collect()
}
