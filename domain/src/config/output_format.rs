//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for orchestration results
///
/// This is a domain concept representing how a [`ResponseEnvelope`] should be
/// rendered.
///
/// [`ResponseEnvelope`]: crate::orchestration::value_objects::ResponseEnvelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Final answer only (default)
    #[default]
    Answer,
    /// Final answer plus every contribution and run statistics
    Full,
    /// JSON envelope
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_answer() {
        assert_eq!(OutputFormat::default(), OutputFormat::Answer);
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&OutputFormat::Full).unwrap();
        assert_eq!(json, "\"full\"");
    }

    #[test]
    fn test_deserialize_lowercase() {
        let format: OutputFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, OutputFormat::Json);
    }
}
