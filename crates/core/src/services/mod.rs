pub mod aggregation_service;
pub mod analytics_service;
pub mod reconcile_service;
pub mod simulation_service;
