// Domain layer - Core types and failure taxonomy

pub mod errors;
pub mod model;
