pub mod common;

mod detect_handler_test;
