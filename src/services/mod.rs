pub mod candidate_service;
pub mod derivation;
pub mod report_service;
