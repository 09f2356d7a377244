pub mod analyze;
pub mod demo_app;
