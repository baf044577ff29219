//! Property test modules

mod tab_set_tests;
