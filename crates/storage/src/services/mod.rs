pub mod algorithm;
pub mod scoring;
pub mod team_formation;
