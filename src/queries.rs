pub mod follows;
pub mod users;
