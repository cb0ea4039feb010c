//! Team schedule aggregation: scraped result tables and spreadsheet exports
//! in, one HTML page and one calendar feed per scope out.

pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod reference;
pub mod render;
pub mod schedule;
pub mod sheet;
pub mod sources;
pub mod text;

pub use error::{Result, ScheduleError};
