pub mod quote_router;
pub mod customer_router;
pub mod material_router;
pub mod seo_router;
