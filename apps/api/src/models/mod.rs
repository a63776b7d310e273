pub mod gallery;
pub mod user;
