pub mod product;
pub mod query_window;
pub mod station;
