pub mod brand;
pub mod image;
pub mod product;
