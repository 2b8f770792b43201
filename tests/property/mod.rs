//! Property-based tests for the pure decision core

mod command_safety;
mod gate_totality;
