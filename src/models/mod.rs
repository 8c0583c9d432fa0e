pub mod answer;
pub mod catalog;
pub mod difficulty;
pub mod progress;
pub mod question;
pub mod session;
pub mod stored_result;
pub mod subject;
pub mod test_record;
pub mod test_result;
pub mod trophy;
pub mod user;
