//! Rule variants the generator can be configured with

use serde::{Deserialize, Serialize};

/// What stops a soldier's forward step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoldierAdvance {
    /// Only a piece of the soldier's own side blocks; an enemy is captured
    #[default]
    BlockedByOwn,
    /// Any piece on the square ahead blocks the step
    BlockedByAny,
}

impl SoldierAdvance {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoldierAdvance::BlockedByOwn => "blocked_by_own",
            SoldierAdvance::BlockedByAny => "blocked_by_any",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rules {
    pub soldier_advance: SoldierAdvance,
    /// Reject an elephant jump when the diagonal midpoint is occupied
    pub elephant_eye: bool,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn soldier_advance(mut self, soldier_advance: SoldierAdvance) -> Self {
        self.soldier_advance = soldier_advance;
        self
    }

    pub fn elephant_eye(mut self, enabled: bool) -> Self {
        self.elephant_eye = enabled;
        self
    }
}
