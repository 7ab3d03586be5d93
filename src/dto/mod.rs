pub mod candidate_dto;
pub mod stats_dto;
