//! Trip Concierge - conversational Jeju travel recommendations.
//!
//! A session gathers trip attributes over free-text turns. Once enough is
//! known, lodging, sights, food and events are retrieved per category
//! (concurrently or one after another) and handed to synthesis, which
//! writes the itinerary.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
