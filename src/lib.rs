pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod refresh_job;

#[cfg(test)]
pub(crate) mod test_support;
