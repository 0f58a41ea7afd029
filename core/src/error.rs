use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Remote analyzer error: {0}")]
    Remote(#[from] reqwest::Error),

    #[error("Remote analyzer returned status {status}")]
    RemoteStatus { status: u16 },

    #[error("Country '{code}' not found")]
    CountryNotFound { code: String },

    #[error("Game '{game_id}' not found")]
    GameNotFound { game_id: String },

    #[error("Year {year} outside playable range {min}..={max}")]
    InvalidYear { year: i32, min: i32, max: i32 },

    #[error("Command text is empty")]
    EmptyCommand,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type GameResult<T> = Result<T, GameError>;
