pub mod backend;
pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod reddit;
pub mod scanner;
pub mod thread;

#[cfg(test)]
mod testing;
