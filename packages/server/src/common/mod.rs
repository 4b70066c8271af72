// Common types and utilities shared across the application

pub mod cache;

pub use cache::{
    CacheLookup, Clock, DatasetFetcher, ManualClock, SystemClock, TimedFallbackCache,
};
