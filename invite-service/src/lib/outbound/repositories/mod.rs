pub mod account;
pub mod memory;

pub use account::PostgresAccountDirectory;
pub use memory::InMemoryAccountDirectory;
