pub mod index;
pub mod v1;
