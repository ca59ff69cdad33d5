// Repositories module - persistence layer

pub mod cart_repository;
pub mod slot;

pub use cart_repository::{CartRepository, DEFAULT_CART_KEY};
pub use slot::{FileSlot, InMemorySlot, PersistenceSlot};
