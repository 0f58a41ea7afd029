//! Shared primitive types used across the entire game.

/// Opaque identifier of one game session (one row in `game_state`).
pub type GameId = String;

/// A stable, unique identifier for any persisted entity.
pub type EntityId = String;

/// Country code as stored in the roster, e.g. `"EG"`.
pub type CountryCode = String;
