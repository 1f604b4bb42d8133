// Library for tests to access modules

pub mod classify;
pub mod cli;
pub mod config;
pub mod counter_source;
pub mod error;
pub mod models;
pub mod probe;
pub mod reconcile;
pub mod report;
pub mod state_store;
pub mod version;
