//! Integration tests for the numeric solver engine

// System pipeline tests
mod system_tests;

// Configuration tests
mod config_tests;
