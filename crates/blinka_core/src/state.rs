/// Outcome of the current run.
/// Only `Playing` is ever entered; nothing in the game transitions to `Won`
/// or `Lost` yet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameState {
    /// All states in display order.
    pub const ALL: &'static [GameState] = &[GameState::Playing, GameState::Won, GameState::Lost];

    /// Short human-readable label for overlay display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Playing => "Playing",
            Self::Won => "Won",
            Self::Lost => "Lost",
        }
    }

    /// Numeric state code: 0 play, 1 win, -1 lose.
    pub fn code(self) -> i8 {
        match self {
            Self::Playing => 0,
            Self::Won => 1,
            Self::Lost => -1,
        }
    }

    pub fn is_finished(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
