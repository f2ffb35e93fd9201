mod config;
pub use config::ConfigCredentialProvider;

mod r#static;
pub use r#static::StaticCredentialProvider;
