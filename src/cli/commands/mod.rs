pub mod fixture;
pub mod path;
pub mod user;
