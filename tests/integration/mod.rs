//! Integration tests for the xcsh command shell

mod completion_values;
mod config_integration;
mod consistency;
mod dispatch_scenarios;
mod precedence;
mod script_generation;
mod shell_session;
mod test_utils;
