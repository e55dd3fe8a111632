// Domain layer - Sample and chart models
pub mod chart;
pub mod sample;
