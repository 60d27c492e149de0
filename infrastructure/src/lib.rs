// Module declarations
pub mod persistence;

pub use persistence::InMemoryDocumentRepository;
