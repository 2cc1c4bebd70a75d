//! Integration tests for symbolic expressions

// Parsing and display
mod parser_tests;

// Analytic derivatives against finite differences
mod derivative_tests;
