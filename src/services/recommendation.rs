//! Slot recommendation: where to insert a new visit so that it adds the least
//! travel to a rep's existing day.
//!
//! Neighbor lookup is a linear scan per candidate. Fine for a rep's day (tens
//! of events); a large calendar would want an index over start/end instants.

use crate::config::EngineConfig;
use crate::error::{AppError, Result};
use crate::models::{CalendarEvent, CandidateWindow, GeoPoint, RecommendationResult, SlotRequest};
use crate::services::location_service::LocationService;
use time::{Duration, PrimitiveDateTime, Time};

#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    day_start: Time,
    day_end: Time,
    max_suggestions: usize,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        RecommendationEngine {
            day_start: Time::from_hms(crate::constants::DAY_START_HOUR, 0, 0)
                .unwrap_or(Time::MIDNIGHT),
            day_end: Time::from_hms(crate::constants::DAY_END_HOUR, 0, 0)
                .unwrap_or(Time::MIDNIGHT),
            max_suggestions: crate::constants::MAX_SUGGESTIONS,
        }
    }
}

impl RecommendationEngine {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.validate().map_err(AppError::InvalidInput)?;
        let hour = |h: u8| {
            Time::from_hms(h, 0, 0).map_err(|e| AppError::InvalidInput(format!("hour {}: {}", h, e)))
        };

        Ok(RecommendationEngine {
            day_start: hour(config.workday_start_hour)?,
            day_end: hour(config.workday_end_hour)?,
            max_suggestions: config.max_suggestions,
        })
    }

    /// Rank insertion slots for `request` among `events`.
    ///
    /// Any travel-time failure aborts the whole call; no partial list is returned.
    pub fn recommend(
        &self,
        request: &SlotRequest,
        events: &[CalendarEvent],
        location: &LocationService,
    ) -> Result<Vec<RecommendationResult>> {
        request.validate()?;

        let mut sorted: Vec<&CalendarEvent> = events.iter().collect();
        sorted.sort_by_key(|event| event.start_at);

        // A buffered slot longer than the whole range fits nowhere.
        let span_minutes = (request.date_end - request.date_start).whole_minutes();
        let needed_minutes = request
            .duration_minutes
            .checked_add(request.buffer_minutes.saturating_mul(2));
        if needed_minutes.map_or(true, |needed| needed > span_minutes) {
            tracing::debug!(
                duration = request.duration_minutes,
                buffer = request.buffer_minutes,
                "Slot longer than the requested range"
            );
            return Ok(Vec::new());
        }
        let duration = Duration::minutes(request.duration_minutes);
        let buffer = Duration::minutes(request.buffer_minutes);

        let windows = self.build_candidate_windows(request.date_start, request.date_end, &sorted);
        let mut suggestions = Vec::with_capacity(windows.len());
        for window in &windows {
            let Some((candidate_start, candidate_end)) = place_in_window(window, duration, buffer)
            else {
                continue;
            };

            let (previous, next) = find_neighbors(&sorted, candidate_start, candidate_end);
            suggestions.push(score_candidate(
                candidate_start,
                candidate_end,
                previous,
                next,
                request.location,
                location,
            )?);
        }

        tracing::debug!(
            events = sorted.len(),
            windows = windows.len(),
            candidates = suggestions.len(),
            "Recommendation: {} windows, {} candidates",
            windows.len(),
            suggestions.len()
        );

        suggestions.sort_by(|a, b| {
            a.added_travel_minutes
                .total_cmp(&b.added_travel_minutes)
                .then(a.start_at.cmp(&b.start_at))
        });
        suggestions.truncate(self.max_suggestions);
        Ok(suggestions)
    }

    /// Free gaps between `sorted` events inside `[date_start, date_end)`, each
    /// clipped to the working hours of the day the gap starts on.
    pub fn build_candidate_windows(
        &self,
        date_start: PrimitiveDateTime,
        date_end: PrimitiveDateTime,
        sorted: &[&CalendarEvent],
    ) -> Vec<CandidateWindow> {
        let mut gaps = Vec::with_capacity(sorted.len() + 1);
        let mut cursor = date_start;

        for event in sorted {
            if cursor < event.start_at {
                gaps.push(CandidateWindow {
                    start: cursor,
                    end: event.start_at,
                });
            }
            cursor = cursor.max(event.end_at);
        }
        if cursor < date_end {
            gaps.push(CandidateWindow {
                start: cursor,
                end: date_end,
            });
        }

        gaps.into_iter()
            .filter_map(|gap| self.clip_to_workday(gap))
            .collect()
    }

    // A gap spanning midnight is clipped with its first day's bounds only.
    fn clip_to_workday(&self, gap: CandidateWindow) -> Option<CandidateWindow> {
        let day = gap.start.date();
        let start = gap.start.max(PrimitiveDateTime::new(day, self.day_start));
        let end = gap.end.min(PrimitiveDateTime::new(day, self.day_end));
        (start < end).then_some(CandidateWindow { start, end })
    }
}

/// Buffered slot at the start of `window`, or `None` when it does not fit.
fn place_in_window(
    window: &CandidateWindow,
    duration: Duration,
    buffer: Duration,
) -> Option<(PrimitiveDateTime, PrimitiveDateTime)> {
    let start = window.start.checked_add(buffer)?;
    let end = start.checked_add(duration)?;
    (end.checked_add(buffer)? <= window.end).then_some((start, end))
}

/// Last event finished by `slot_start` and first event starting at or after `slot_end`.
fn find_neighbors<'a>(
    sorted: &[&'a CalendarEvent],
    slot_start: PrimitiveDateTime,
    slot_end: PrimitiveDateTime,
) -> (Option<&'a CalendarEvent>, Option<&'a CalendarEvent>) {
    let mut previous = None;
    let mut next = None;

    for event in sorted {
        if event.end_at <= slot_start {
            previous = Some(*event);
        }
        if next.is_none() && event.start_at >= slot_end {
            next = Some(*event);
        }
    }

    (previous, next)
}

fn score_candidate(
    start_at: PrimitiveDateTime,
    end_at: PrimitiveDateTime,
    previous: Option<&CalendarEvent>,
    next: Option<&CalendarEvent>,
    new_location: GeoPoint,
    location: &LocationService,
) -> Result<RecommendationResult> {
    let prev_to_new = match previous {
        Some(p) => location.estimate_travel_minutes(p.location(), new_location)?,
        None => 0.0,
    };
    let new_to_next = match next {
        Some(n) => location.estimate_travel_minutes(new_location, n.location())?,
        None => 0.0,
    };
    let prev_to_next = match (previous, next) {
        (Some(p), Some(n)) => location.estimate_travel_minutes(p.location(), n.location())?,
        _ => 0.0,
    };

    let added_travel_minutes = round_tenth((prev_to_new + new_to_next - prev_to_next).max(0.0));
    let total_travel_minutes = round_tenth(prev_to_new + new_to_next);
    let before_event_id = previous.map(|e| e.id.clone());
    let after_event_id = next.map(|e| e.id.clone());

    let explanation = format!(
        "Inserted between {} and {} with +{:.1} min travel",
        before_event_id.as_deref().unwrap_or("START"),
        after_event_id.as_deref().unwrap_or("END"),
        added_travel_minutes
    );

    Ok(RecommendationResult {
        start_at,
        end_at,
        before_event_id,
        after_event_id,
        added_travel_minutes,
        total_travel_minutes,
        explanation,
    })
}

fn round_tenth(minutes: f64) -> f64 {
    (minutes * 10.0).round() / 10.0
}
