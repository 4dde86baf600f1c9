pub mod application;
pub mod auth;
pub mod config;
pub mod form;
pub mod logging;
pub mod navigation;
pub mod prelude;
pub mod screens;

pub use application::{Screen, StaffApplication};
