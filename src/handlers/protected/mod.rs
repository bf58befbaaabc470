// handlers/protected/mod.rs - routes that need a valid credential
pub mod course;
pub mod forum;
pub mod gallery;
pub mod note;
pub mod portfolio;
pub mod profile;
