// handlers/elevated/mod.rs - admin-only routes under /admin
pub mod dashboard;
pub mod moderation;
pub mod story;
pub mod user;
