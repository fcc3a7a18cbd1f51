pub mod cart;
pub mod not_found;
pub mod products;
