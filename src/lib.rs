pub mod advice;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod date_parser;
pub mod error;
pub mod handler;
pub mod http;
pub mod ical;
pub mod intent;
pub mod llm;
pub mod model;
pub mod pitchero;
pub mod places;
pub mod planner;
pub mod prompts;
pub mod report;
pub mod resolver;
pub mod store;
pub mod training;
pub mod weather;
