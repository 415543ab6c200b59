pub mod crypto;
pub mod in_memory;
