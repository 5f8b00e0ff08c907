//! Built-in analyzers

pub mod shared_output_path;

pub use shared_output_path::SharedOutputPathAnalyzer;
