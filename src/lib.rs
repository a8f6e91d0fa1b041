pub mod calendar;
pub mod config;
pub mod error;
pub mod filters;
pub mod loader;
pub mod output;
pub mod pager;
pub mod session;
pub mod stats;
