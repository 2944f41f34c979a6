pub mod compile;
pub mod config;
pub mod environment;
pub mod lint;
pub mod reader;
pub mod run;
pub mod value;
