//! Integration tests for the parameter system
//!
//! These tests verify that parameters and id lists behave correctly in various scenarios.

// Tests for IdList
mod id_list_tests;
