// Application layer - The chart pipeline and its seams
pub mod chart_assembly;
pub mod chart_renderer;
pub mod dashboard_service;
pub mod error;
pub mod normalizer;
pub mod orderer;
pub mod sample_source;
