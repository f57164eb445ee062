pub mod commandline;
pub mod configuration;
pub mod context;
pub mod error;
pub mod geo_math;
pub mod player;
pub mod track;
pub mod utils;
