pub mod quote_dto;
pub mod customer_dto;
pub mod material_dto;
pub mod seo_dto;
