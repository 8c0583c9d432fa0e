pub mod quiz_dto;
pub mod session_dto;
pub mod store_dto;
