//! Integration tests of the public crate surface.

mod channel_tests;
mod csv_datasource_tests;
mod datasource_validation_tests;
mod engine_tests;
mod parsing_tests;
