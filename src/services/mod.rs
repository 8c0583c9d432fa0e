pub mod catalog_service;
pub mod generator_service;
pub mod scoring_service;
pub mod session_service;
