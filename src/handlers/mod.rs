// handlers/mod.rs - route handlers grouped by audience
//
// public: login and the training path catalog (/login, /api/*)
// admin:  administration area (/admin)

pub mod admin;
pub mod public;
