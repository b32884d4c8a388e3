use uuid::Uuid;

// Fresh identifier for uploaded background images
pub fn generate_uuid_string() -> String {
    Uuid::new_v4().to_string()
}
