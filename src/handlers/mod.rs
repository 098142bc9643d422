//! HTTP handlers

pub mod health;
pub mod model;
pub mod page;
pub mod screen;
