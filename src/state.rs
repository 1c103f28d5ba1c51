//! The abstract game-state contract the search tree is generic over.
//!
//! Concrete game rules (board encoding, piece comparison, move legality) live outside this
//! crate entirely; this module only names the shape MCTS needs to treat a state as opaque.

use std::fmt::Debug;

/// Which kind of turn a state is currently at.
///
/// `Env` is the non-strategic "draw from the hidden bag" turn: its outcome is sampled from
/// a fixed distribution rather than chosen by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Turn {
    Player(u8),
    Env,
}

impl Turn {
    pub fn is_env(self) -> bool {
        matches!(self, Turn::Env)
    }

    /// The other strategic player. Panics if called on `Env` — callers only ask this of a
    /// `Turn::Player` they already hold, mirroring `hexwar_core::game::Player::opponent`.
    pub fn opponent(self) -> Turn {
        match self {
            Turn::Player(0) => Turn::Player(1),
            Turn::Player(1) => Turn::Player(0),
            Turn::Player(p) => panic!("opponent() called on out-of-range player {p}"),
            Turn::Env => panic!("opponent() called on the environment turn"),
        }
    }
}

/// Outcome of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Player(u8),
    Draw,
}

/// A two-adversary, partial-information stochastic game state.
///
/// Implementations must be cheap to clone (the engine clones the root state once per worker
/// and mutates the clone in place along each descent) and must be pure: `legal_moves`,
/// `env_move_weights`, `game_ended`, `winner`, and `current_player` must agree with each
/// other and must not have side effects beyond the state itself.
pub trait GameState: Clone + Send + Sync {
    /// A legal move, or environment outcome, from this state.
    type Move: Copy + Eq + Debug + Send + Sync;

    /// Whose turn it is: one of the two players, or the environment.
    fn current_player(&self) -> Turn;

    /// Shorthand for `current_player().is_env()`.
    fn is_env_move(&self) -> bool {
        self.current_player().is_env()
    }

    /// Whether the game has concluded.
    fn game_ended(&self) -> bool;

    /// The winner, if the game has ended. Must be `None` while `game_ended()` is false.
    fn winner(&self) -> Option<Outcome>;

    /// Legal strategic moves for the current player. Only called when `current_player()` is
    /// `Turn::Player(_)`.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// The environment's probability kernel over its next move, as non-negative (not
    /// necessarily normalized) weights. Only called when `current_player()` is `Turn::Env`;
    /// must return at least one entry in that case.
    fn env_move_weights(&self) -> Vec<(Self::Move, f64)>;

    /// Advance the state in place by the given move. Precondition: `mv` is legal for the
    /// current turn kind (one of `legal_moves()` for a player turn, one of
    /// `env_move_weights()`'s moves for an environment turn).
    fn do_move(&mut self, mv: Self::Move);
}
