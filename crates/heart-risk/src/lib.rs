//! Heart disease risk form: field validation, draft persistence, prediction
//! client and the interaction state machine that ties them together.

pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod prediction;
pub mod presenter;
pub mod telemetry;
