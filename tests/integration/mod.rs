//! Integration tests for the cortex gate

mod command_builder;
mod config_integration;
mod gate_flow;
mod session_sled;
mod test_utils;
