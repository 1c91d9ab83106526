pub mod repository_error;
pub mod quote_repo;
pub mod customer_repo;
pub mod material_repo;
