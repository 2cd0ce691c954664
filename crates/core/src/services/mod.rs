pub mod aggregation_service;
pub mod goal_service;
pub mod score_service;
pub mod spending_service;
pub mod tier_service;
