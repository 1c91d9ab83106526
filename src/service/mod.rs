pub mod quote_service;
pub mod customer_service;
pub mod material_service;
