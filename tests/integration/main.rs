//! Integration tests for gmr

mod helpers;

mod cli_test;
mod parse_test;
mod pipeline_test;
