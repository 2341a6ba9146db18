pub mod backup;
pub mod capture;
pub mod experiment;
pub mod narrate;
