use crate::models::instant::iso;
use crate::models::GeoPoint;
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

/// A stored visit on a sales rep's calendar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesEvent {
    pub id: String,
    pub title: String,
    pub address: String,
    #[serde(with = "iso")]
    pub start_at: PrimitiveDateTime,
    #[serde(with = "iso")]
    pub end_at: PrimitiveDateTime,
    pub lat: f64,
    pub lng: f64,
    pub sales_rep_id: String,
    pub time_zone: Option<String>,
}

/// Fields of an event before the store assigns it an id.
#[derive(Debug, Clone)]
pub struct NewSalesEvent {
    pub title: String,
    pub address: String,
    pub start_at: PrimitiveDateTime,
    pub end_at: PrimitiveDateTime,
    pub location: GeoPoint,
    pub sales_rep_id: String,
    pub time_zone: Option<String>,
}

/// Read-only snapshot of a busy interval, as consumed by the recommendation engine.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub id: String,
    pub start_at: PrimitiveDateTime,
    pub end_at: PrimitiveDateTime,
    pub lat: f64,
    pub lng: f64,
}

impl CalendarEvent {
    pub fn location(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

impl From<&SalesEvent> for CalendarEvent {
    fn from(event: &SalesEvent) -> Self {
        CalendarEvent {
            id: event.id.clone(),
            start_at: event.start_at,
            end_at: event.end_at,
            lat: event.lat,
            lng: event.lng,
        }
    }
}
