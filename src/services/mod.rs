// src/services/mod.rs
pub mod generation_service;
pub mod image_processor;
pub mod prompt_composer;
pub mod providers;
pub mod redis_service;
pub mod repository;
pub mod stats;

pub use generation_service::GenerationService;
pub use image_processor::ImageProcessor;
pub use redis_service::RedisRepository;
pub use repository::{AdRepository, MemoryRepository};
