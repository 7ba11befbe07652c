// handlers/public/mod.rs - handlers without authentication
//
// login.rs          POST /login
// training_paths.rs GET  /api/training-paths/*, /api/katas/training-path/:id

pub mod login;
pub mod training_paths;

pub use login::standard_login;
pub use training_paths::{
    get_katas_by_training_path_id, get_katas_of_training_path_by_topic, get_training_path_by_topic,
    get_training_paths_for_grid, get_training_paths_without_katas,
};
