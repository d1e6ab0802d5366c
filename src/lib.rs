pub mod cli;
pub mod config;
pub mod daemon;
pub mod dispatch;
pub mod display;
pub mod engine;
pub mod error;
pub mod grab;
pub mod hotkey;

#[cfg(test)]
pub mod test_utils;
