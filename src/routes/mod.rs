pub mod candidate_routes;
pub mod extract;
pub mod health;
pub mod openapi;
pub mod stats_routes;
