//! Node repositories
//!
//! The controller fetches nodes through the `NodeRepository` trait.
//! `FileRepository` reads from a data folder, `HttpRepository` from a base
//! URL, and `InMemoryRepository` serves documents registered up front.

mod cache;
mod file;
mod http;
mod memory;
mod traits;

pub use cache::ResponseCache;
pub use file::FileRepository;
pub use http::HttpRepository;
pub use memory::InMemoryRepository;
pub use traits::{NodeRepository, RepositoryError, RepositoryResult};
