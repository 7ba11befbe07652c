// handlers/admin/mod.rs - administration area
//
// The settings grid lives with the other training path reads
// (GET /api/training-paths/grid); this module only serves the area root.

/// GET /admin
pub async fn admin_home() -> &'static str {
    "Hello, admin!"
}
