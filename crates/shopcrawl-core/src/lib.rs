pub mod config;
pub mod product;
pub mod validate;

pub use config::{load_app_config, load_app_config_from_env, AppConfig, ConfigError};
pub use product::{Product, Variant, VariantGroup};
pub use validate::{validate_products, validate_values, ValidationError};
