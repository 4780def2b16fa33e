mod cache;

pub use cache::TokenCache;
