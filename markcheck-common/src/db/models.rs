//! Database entity models

use crate::verdict::Verdict;
use serde::{Deserialize, Serialize};

/// One imaging event captured by an inspection camera
///
/// Created by the intake flow; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inspection {
    pub id: String,
    /// Capture time (RFC 3339), distinct from the store's created_at
    pub timestamp: String,
    pub camera_id: String,
    pub image_url: String,
    pub status: String,
    pub created_at: String,
}

/// One located marking within an inspection's image
///
/// `verdict` is computed once at creation from the thresholds configured at
/// that moment. The override fields are the only mutable part of the record;
/// a new override replaces any prior one wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub id: String,
    pub inspection_id: String,
    pub bbox_x1: f64,
    pub bbox_y1: f64,
    pub bbox_x2: f64,
    pub bbox_y2: f64,
    pub crop_url: String,
    pub ocr_text: String,
    pub ocr_confidence: f64,
    pub match_score: f64,
    pub verdict: Verdict,
    /// Advisory link to a datasheet; never validated for existence
    pub datasheet_id: Option<String>,
    pub datasheet_excerpt: Option<String>,
    pub override_by: Option<String>,
    pub override_verdict: Option<Verdict>,
    pub override_notes: Option<String>,
    pub created_at: String,
}

impl Detection {
    /// The verdict consumers display: the override when present, else the
    /// originally computed verdict
    pub fn effective_verdict(&self) -> Verdict {
        self.override_verdict.unwrap_or(self.verdict)
    }
}

/// Vendor reference record managed by the admin flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Datasheet {
    pub id: String,
    pub vendor: String,
    pub part_number: String,
    pub datasheet_url: String,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_detection() -> Detection {
        Detection {
            id: "d-1".to_string(),
            inspection_id: "i-1".to_string(),
            bbox_x1: 100.0,
            bbox_y1: 80.0,
            bbox_x2: 300.0,
            bbox_y2: 180.0,
            crop_url: "http://example/crop.png".to_string(),
            ocr_text: "IC4821".to_string(),
            ocr_confidence: 0.91,
            match_score: 0.7,
            verdict: Verdict::Suspicious,
            datasheet_id: None,
            datasheet_excerpt: None,
            override_by: None,
            override_verdict: None,
            override_notes: None,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_effective_verdict_without_override() {
        let detection = sample_detection();
        assert_eq!(detection.effective_verdict(), Verdict::Suspicious);
    }

    #[test]
    fn test_effective_verdict_with_override() {
        let mut detection = sample_detection();
        detection.override_by = Some("alice".to_string());
        detection.override_verdict = Some(Verdict::Genuine);
        detection.override_notes = Some("marking matches datasheet".to_string());

        assert_eq!(detection.effective_verdict(), Verdict::Genuine);
        // The computed verdict stays visible alongside the override
        assert_eq!(detection.verdict, Verdict::Suspicious);
    }
}
