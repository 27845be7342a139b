pub mod constants;
pub mod engine;
pub mod error;
pub mod input_utils;
pub mod orchestrator;
pub mod protocol;
pub mod rng;
pub mod settings;
pub mod telemetry;
pub mod ticker;
pub mod types;
