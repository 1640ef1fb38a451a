pub mod dynamodb;
pub mod filesystem;
pub mod parsers;
