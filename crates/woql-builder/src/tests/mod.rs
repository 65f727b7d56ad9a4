mod builder_tests;
mod value_tests;
