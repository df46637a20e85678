pub mod follows;
pub mod responses;
pub mod sessions;
pub mod users;
