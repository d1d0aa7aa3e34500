mod commands;
mod render;
mod setup;

pub use commands::{print_error, run};
