//! Error types
//!
//! The simulation itself never fails at runtime (pool exhaustion is a silent
//! skip). Errors come from decoding out-of-range variant indices and from
//! the persistence layer.

use core::fmt;

#[derive(Debug)]
pub enum GameError {
    UnknownWeaponClass(u8),
    UnknownEnemyType(u8),
    UnknownPattern(u8),
    UnknownBossType(u8),
    /// Key-value storage rejected a read or write
    Storage { key: String, reason: String },
    Serialization(serde_json::Error),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownWeaponClass(index) => write!(f, "unknown weapon class: {index}"),
            Self::UnknownEnemyType(index) => write!(f, "unknown enemy type: {index}"),
            Self::UnknownPattern(index) => write!(f, "unknown movement pattern: {index}"),
            Self::UnknownBossType(index) => write!(f, "unknown boss type: {index}"),
            Self::Storage { key, reason } => write!(f, "storage error for '{key}': {reason}"),
            Self::Serialization(err) => write!(f, "serialization error: {err}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_bad_index() {
        assert_eq!(GameError::UnknownWeaponClass(7).to_string(), "unknown weapon class: 7");
        let err = GameError::Storage {
            key: "scores".into(),
            reason: "quota exceeded".into(),
        };
        assert_eq!(err.to_string(), "storage error for 'scores': quota exceeded");
    }

    #[test]
    fn test_serde_errors_convert() {
        let err: GameError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, GameError::Serialization(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
