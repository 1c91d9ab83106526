pub mod quote_handler;
pub mod customer_handler;
pub mod material_handler;
pub mod seo_handler;
