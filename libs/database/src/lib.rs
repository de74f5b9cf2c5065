//! Database connectors for the Lost & Found services.
//!
//! Only MongoDB is supported. Enable the `config` feature to load
//! [`mongodb::MongoConfig`] through `core_config::FromEnv`.
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//!
//! let config = MongoConfig::new("mongodb://127.0.0.1:27017/lostfound");
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
