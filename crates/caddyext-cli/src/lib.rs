//! caddyext library - expose the command layer for testing

pub mod commands;
pub mod common;
