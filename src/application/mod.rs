pub mod dto;
pub mod ports;
pub mod preprocess;
pub mod services;
