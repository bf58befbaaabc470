// handlers/mod.rs - handlers grouped by security tier
//
// public    - no credential needed (an invalid one is treated as a guest)
// protected - any authenticated user; course member routes need normal_user
// elevated  - admin role only
pub mod elevated;
pub mod protected;
pub mod public;
