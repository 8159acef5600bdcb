mod commands;
pub mod print;
mod setup;

pub use commands::run;
