pub mod classes;
pub mod errors;
pub mod model;
pub mod prediction;
pub mod upload;
