pub mod errors;
pub mod product;
pub mod category;

pub use category::{available_categories, filter_by_category, PREDEFINED_CATEGORIES};
pub use product::{NewProduct, Product};
