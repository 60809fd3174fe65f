pub mod advisory;
pub mod config;
pub mod dates;
pub mod error;
pub mod gantt;
pub mod model;
pub mod progress;
pub mod project_api;
pub mod schedule;
pub mod storage;
pub mod suggest;
