mod schema;

pub use schema::{Config, DatabaseConfig, MailConfig, ProfileConfig, ServerConfig};
