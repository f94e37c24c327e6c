pub mod best_sellers;
pub mod get_product;
pub mod list_products;
pub mod new_arrivals;
pub mod search_products;

pub use best_sellers::best_sellers;
pub use get_product::get_product;
pub use list_products::list_products;
pub use new_arrivals::new_arrivals;
pub use search_products::search_products;
