pub mod fixtures;

pub mod pipeline_tests;
