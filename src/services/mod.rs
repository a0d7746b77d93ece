pub mod geoapify;
pub mod haversine;
pub mod location_service;
pub mod providers;
pub mod recommendation;
