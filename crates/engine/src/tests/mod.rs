mod handler_tests;
mod helpers;
