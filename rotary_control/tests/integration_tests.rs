//! Integration tests for the rotary control library.
//!
//! These tests drive several components together: the plant on its own,
//! the full cascade, and assembly from configuration files.

mod integration;
