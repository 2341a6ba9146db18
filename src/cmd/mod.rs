pub mod backup;
pub mod capture;
pub mod config;
pub mod experiment;
pub mod history;
pub mod status;
pub mod story;
