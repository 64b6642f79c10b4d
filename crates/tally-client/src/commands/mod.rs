pub mod anomalies;
pub(crate) mod common;
pub mod demo;
pub mod forecast;
pub mod health;
pub mod patterns;
