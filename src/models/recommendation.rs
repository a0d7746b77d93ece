use crate::error::{AppError, Result};
use crate::models::instant::iso;
use crate::models::GeoPoint;
use serde::Serialize;
use time::PrimitiveDateTime;

/// A free interval between busy events, already clipped to working hours.
/// Always satisfies `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateWindow {
    pub start: PrimitiveDateTime,
    pub end: PrimitiveDateTime,
}

/// What the caller wants to fit into the calendar.
#[derive(Debug, Clone, Copy)]
pub struct SlotRequest {
    pub date_start: PrimitiveDateTime,
    pub date_end: PrimitiveDateTime,
    pub location: GeoPoint,
    pub duration_minutes: i64,
    pub buffer_minutes: i64,
}

impl SlotRequest {
    pub fn validate(&self) -> Result<()> {
        if self.date_end <= self.date_start {
            return Err(AppError::InvalidInput(
                "date_end must be after date_start".to_string(),
            ));
        }
        if self.duration_minutes <= 0 {
            return Err(AppError::InvalidInput(
                "duration must be positive".to_string(),
            ));
        }
        if self.buffer_minutes < 0 {
            return Err(AppError::InvalidInput(
                "buffer must be zero or positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// One ranked insertion slot.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationResult {
    #[serde(with = "iso")]
    pub start_at: PrimitiveDateTime,
    #[serde(with = "iso")]
    pub end_at: PrimitiveDateTime,
    pub before_event_id: Option<String>,
    pub after_event_id: Option<String>,
    /// Marginal travel introduced by the insertion, never negative.
    pub added_travel_minutes: f64,
    /// Travel into and out of the new event.
    pub total_travel_minutes: f64,
    pub explanation: String,
}
