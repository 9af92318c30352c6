//! Adapters implementing domain ports.

pub mod memory;
