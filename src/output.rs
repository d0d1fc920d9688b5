//! Output types: per-image results and whole-scan statistics.

use serde::{Deserialize, Serialize};

/// One successfully captioned image.
///
/// Immutable once created; the coordinator appends these to its accumulator
/// in candidate-discovery order and never touches them again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaptionResult {
    /// Absolute URL the image was fetched from.
    pub image_url: String,
    /// Caption produced by the model, cleaned of formatting artefacts.
    pub caption: String,
}

/// Complete result of a page scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOutput {
    /// Captioned images in discovery order, at most `quota` entries.
    /// Empty is a valid outcome: the page had no qualifying images.
    pub captions: Vec<CaptionResult>,
    /// Counters and timings for the run.
    pub stats: ScanStats,
}

/// Statistics about a scan run.
///
/// `discovered` counts every `<img>` element that yielded a raw reference;
/// the other counters partition what happened to them. Candidates past the
/// quota cutoff appear in `discovered` but in none of the outcome counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Raw image references extracted from the markup.
    pub discovered: usize,
    /// Candidates that resolved to a fetchable URL.
    pub resolved: usize,
    /// Candidates that produced a caption.
    pub captioned: usize,
    /// Candidates dropped at any stage (unresolvable, vector, fetch/decode
    /// failure, too small, caption failure).
    pub skipped: usize,
    /// Wall-clock duration of the whole scan in milliseconds.
    pub total_duration_ms: u64,
    /// Portion of the scan spent inside captioning-model calls.
    pub caption_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_round_trips_through_json() {
        let output = ScanOutput {
            captions: vec![CaptionResult {
                image_url: "https://example.com/a.jpg".into(),
                caption: "a red bicycle leaning against a wall".into(),
            }],
            stats: ScanStats {
                discovered: 4,
                resolved: 3,
                captioned: 1,
                skipped: 2,
                total_duration_ms: 1200,
                caption_duration_ms: 900,
            },
        };

        let json = serde_json::to_string(&output).expect("must serialise");
        let back: ScanOutput = serde_json::from_str(&json).expect("must deserialise");
        assert_eq!(back.captions, output.captions);
        assert_eq!(back.stats.discovered, 4);
    }
}
