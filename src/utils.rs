use std::fmt;

// ---------- Tune-ables ---------- //
pub const W_HP: Score = 1.0; // weight of a favorable health swing
pub const W_MP: Score = 0.25; // weight of a favorable mana swing
pub const W_TERM: Score = 5.0; // weight of a decisive outcome
pub const TIMEOUT_MANA_WEIGHT: f64 = 0.75; // mana's worth when the turn cap forces scoring

// ---------- Basic types (renamed for pretty) ---------- //
pub type Probability = f64;
pub type Score = f64;

/// The two seats of a duel. "Own" and "opponent" are relative to whichever
/// side is currently deciding or being evaluated.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Side {
    P1,
    P2,
}

pub const BOTH_SIDES: [Side; 2] = [Side::P1, Side::P2];

impl Side {
    #[inline]
    pub fn other(self) -> Side {
        match self {
            Side::P1 => Side::P2,
            Side::P2 => Side::P1,
        }
    }

    /// Index into side-ordered pairs such as `[CombatantState; 2]`.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::P1 => 0,
            Side::P2 => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::P1 => write!(f, "Player 1"),
            Side::P2 => write!(f, "Player 2"),
        }
    }
}

/// Failures that escape the engine. Illegal input and degenerate predictions
/// are recovered locally and never show up here.
#[derive(Debug)]
pub enum DuelError {
    /// The decision engine was asked to act in a terminal position. The
    /// match controller must never do this.
    DecisionAfterDeath {
        own_health: i32,
        opponent_health: i32,
    },
    /// Stdin or a model file went away mid-operation.
    Io(std::io::Error),
    /// A persisted model could not be encoded or decoded.
    Model(serde_json::Error),
}

impl fmt::Display for DuelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuelError::DecisionAfterDeath {
                own_health,
                opponent_health,
            } => write!(
                f,
                "decision requested after death (own hp {}, opponent hp {})",
                own_health, opponent_health
            ),
            DuelError::Io(e) => write!(f, "io error: {}", e),
            DuelError::Model(e) => write!(f, "model serialization error: {}", e),
        }
    }
}

impl std::error::Error for DuelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DuelError::Io(e) => Some(e),
            DuelError::Model(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DuelError {
    fn from(e: std::io::Error) -> Self {
        DuelError::Io(e)
    }
}

impl From<serde_json::Error> for DuelError {
    fn from(e: serde_json::Error) -> Self {
        DuelError::Model(e)
    }
}
