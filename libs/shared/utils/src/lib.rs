pub mod audit;
pub mod extractor;
pub mod jwt;
pub mod password;
pub mod resolver;
pub mod store;
pub mod test_utils;
pub mod validate;
