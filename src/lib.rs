//! ReStyle storefront core
//!
//! Catalog browsing for second-hand clothing boxes and the virtual try-on
//! gateway that previews a box's garments on a user photo.

pub mod catalog;
pub mod config;
pub mod encoding;
pub mod error;
pub mod gateway;
pub mod messages;
pub mod models;
pub mod paths;
pub mod session;
pub mod validation;

pub use catalog::{Cart, Catalog, CatalogQuery, ClothingBox, SortOption};
pub use config::GatewayConfig;
pub use encoding::{encode_file, EncodedImage};
pub use error::TryOnError;
pub use gateway::TryOnGateway;
pub use models::{FallbackReason, ImageValidationOutcome, Outcome, TryOnRequest, TryOnResult};
pub use session::{run_try_on, TryOnSession};
pub use validation::{validate, ImageFile};
