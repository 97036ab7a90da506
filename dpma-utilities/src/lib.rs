pub mod logger;
pub mod startup;

pub type SendableError = Box<dyn std::error::Error + Send + Sync>;
