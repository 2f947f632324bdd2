//! Intake form domain

pub mod aggregates;
pub mod events;
pub mod rules;
pub mod state;
pub mod value_objects;
