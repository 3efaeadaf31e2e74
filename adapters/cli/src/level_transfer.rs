#![allow(clippy::missing_errors_doc)]

//! Single-line level transfer codec for clipboard and chat sharing.

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use grid_strike_core::{LevelData, GRID_COLUMNS, GRID_ROWS};

const TRANSFER_DOMAIN: &str = "grid";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded level payload.
pub(crate) const TRANSFER_HEADER: &str = "grid:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes a level into a single-line string suitable for clipboard transfer.
#[must_use]
pub(crate) fn encode(level: &LevelData) -> String {
    let json = serde_json::to_vec(level).expect("level serialization never fails");
    let encoded = STANDARD_NO_PAD.encode(json);
    format!("{TRANSFER_HEADER}:{GRID_COLUMNS}x{GRID_ROWS}:{encoded}")
}

/// Decodes a level from its single-line transfer representation.
pub(crate) fn decode(value: &str) -> Result<LevelData, LevelTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LevelTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LevelTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(LevelTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(LevelTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(LevelTransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(LevelTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(LevelTransferError::UnsupportedVersion(version.to_owned()));
    }

    let (columns, rows) = parse_dimensions(dimensions)?;
    if columns != GRID_COLUMNS || rows != GRID_ROWS {
        return Err(LevelTransferError::DimensionMismatch { columns, rows });
    }

    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LevelTransferError::InvalidEncoding)?;
    serde_json::from_slice(&bytes).map_err(LevelTransferError::InvalidPayload)
}

fn parse_dimensions(value: &str) -> Result<(i32, i32), LevelTransferError> {
    let mut parts = value.split('x');
    let columns = parts
        .next()
        .and_then(|part| part.parse::<i32>().ok())
        .ok_or_else(|| LevelTransferError::InvalidDimensions(value.to_owned()))?;
    let rows = parts
        .next()
        .and_then(|part| part.parse::<i32>().ok())
        .ok_or_else(|| LevelTransferError::InvalidDimensions(value.to_owned()))?;
    if parts.next().is_some() {
        return Err(LevelTransferError::InvalidDimensions(value.to_owned()));
    }
    Ok((columns, rows))
}

/// Failures produced while decoding a transfer string.
#[derive(Debug)]
pub(crate) enum LevelTransferError {
    /// The provided string was empty after trimming.
    EmptyPayload,
    /// The domain prefix was absent.
    MissingPrefix,
    /// The version field was absent.
    MissingVersion,
    /// The grid dimension field was absent.
    MissingDimensions,
    /// The payload field was absent.
    MissingPayload,
    /// The domain prefix did not match.
    InvalidPrefix(String),
    /// The version field named an unsupported codec revision.
    UnsupportedVersion(String),
    /// The grid dimension field could not be parsed.
    InvalidDimensions(String),
    /// The encoded grid does not match the engine's arena size.
    DimensionMismatch {
        /// Columns named by the transfer string.
        columns: i32,
        /// Rows named by the transfer string.
        rows: i32,
    },
    /// The payload was not valid base64.
    InvalidEncoding(base64::DecodeError),
    /// The payload decoded but was not a valid level document.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for LevelTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "transfer string is empty"),
            Self::MissingPrefix => write!(f, "transfer string is missing its domain prefix"),
            Self::MissingVersion => write!(f, "transfer string is missing its version field"),
            Self::MissingDimensions => {
                write!(f, "transfer string is missing its grid dimensions")
            }
            Self::MissingPayload => write!(f, "transfer string is missing its payload"),
            Self::InvalidPrefix(prefix) => {
                write!(f, "unexpected domain prefix {prefix:?}, expected {TRANSFER_DOMAIN:?}")
            }
            Self::UnsupportedVersion(version) => {
                write!(f, "unsupported codec version {version:?}")
            }
            Self::InvalidDimensions(value) => {
                write!(f, "malformed grid dimensions {value:?}")
            }
            Self::DimensionMismatch { columns, rows } => write!(
                f,
                "level targets a {columns}x{rows} grid, this engine runs {GRID_COLUMNS}x{GRID_ROWS}"
            ),
            Self::InvalidEncoding(source) => write!(f, "payload is not valid base64: {source}"),
            Self::InvalidPayload(source) => write!(f, "payload is not a valid level: {source}"),
        }
    }
}

impl Error for LevelTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(source) => Some(source),
            Self::InvalidPayload(source) => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_strike_core::{
        level::{ExitZonePlacement, LevelMetadata, WallPlacement},
        GridPos,
    };

    fn sample_level() -> LevelData {
        LevelData {
            player_start: GridPos::new(12, 16),
            enemies: Vec::new(),
            walls: vec![WallPlacement {
                position: GridPos::new(6, 6),
            }],
            collectibles: Vec::new(),
            power_ups: Vec::new(),
            captives: Vec::new(),
            exit_zones: vec![ExitZonePlacement {
                position: GridPos::new(12, 0),
            }],
            metadata: LevelMetadata::named("transfer"),
        }
    }

    #[test]
    fn a_level_survives_the_transfer_round_trip() {
        let level = sample_level();
        let encoded = encode(&level);
        assert!(encoded.starts_with("grid:v1:25x18:"));
        assert_eq!(encoded.lines().count(), 1);
        let decoded = decode(&encoded).expect("decodes");
        assert_eq!(decoded, level);
    }

    #[test]
    fn foreign_domains_and_versions_are_refused() {
        let encoded = encode(&sample_level());
        let foreign = encoded.replacen("grid", "maze", 1);
        assert!(matches!(
            decode(&foreign),
            Err(LevelTransferError::InvalidPrefix(_))
        ));
        let future = encoded.replacen("v1", "v9", 1);
        assert!(matches!(
            decode(&future),
            Err(LevelTransferError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn mismatched_grid_dimensions_are_refused() {
        let encoded = encode(&sample_level());
        let resized = encoded.replacen("25x18", "30x20", 1);
        assert!(matches!(
            decode(&resized),
            Err(LevelTransferError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn garbage_payloads_are_refused() {
        assert!(matches!(
            decode(""),
            Err(LevelTransferError::EmptyPayload)
        ));
        assert!(matches!(
            decode("grid:v1:25x18:!!!"),
            Err(LevelTransferError::InvalidEncoding(_))
        ));
    }
}
