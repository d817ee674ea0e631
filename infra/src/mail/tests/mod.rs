mod adapter_tests;
mod smtp_tests;
