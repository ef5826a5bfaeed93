use uuid::Uuid;

pub mod product;
pub mod subscription;

pub use product::*;
pub use subscription::*;

// Helper function to generate UUIDs in the format expected by the database
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}
