// handlers/public/mod.rs - routes open to guests
pub mod contact;
pub mod course;
pub mod engage;
pub mod forum;
pub mod gallery;
pub mod portfolio;
pub mod root;
pub mod story;
