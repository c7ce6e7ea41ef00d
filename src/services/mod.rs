// src/services/mod.rs
pub mod numeric;
pub mod columns;
pub mod daily;
pub mod trends;
pub mod calculations;
pub mod pipeline;
pub mod source;
pub mod google_oauth;
pub mod sheets;
pub mod csv_source;
pub mod refresh;
