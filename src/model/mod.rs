pub mod quote;
pub mod material;
pub mod customer;
