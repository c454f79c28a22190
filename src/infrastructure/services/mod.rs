//! Application services

mod cache_manager;

pub use cache_manager::CacheManager;
