mod memory_metadata_repository;
mod pg_metadata_repository;

pub use memory_metadata_repository::InMemoryMetadataRepository;
pub use pg_metadata_repository::PgMetadataRepository;
