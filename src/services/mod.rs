pub mod excel;
pub mod file_loader;
pub mod profiler;
pub mod registry;
