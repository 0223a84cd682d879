//! Version repository adapters.

mod memory;

pub use memory::InMemoryVersionRepository;
