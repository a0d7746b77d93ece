pub mod event;
pub mod geo;
pub mod instant;
pub mod recommendation;

pub use event::{CalendarEvent, NewSalesEvent, SalesEvent};
pub use geo::GeoPoint;
pub use recommendation::{CandidateWindow, RecommendationResult, SlotRequest};
