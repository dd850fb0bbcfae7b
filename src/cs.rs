pub mod hashing;

// Re-export the table family
pub use hashing::*;
