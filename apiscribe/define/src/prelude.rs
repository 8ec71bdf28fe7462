//! Convenient re-exports for working with apiscribe definitions.
//!
//! ## Examples
//!
//! ```
//! use apiscribe_define::prelude::*;
//!
//! let spec = ApiSpec {
//!     title: "Inventory".to_string(),
//!     version: "1.0.0".to_string(),
//!     description: None,
//!     servers: vec!["https://api.example.com".to_string()],
//!     definitions: None,
//!     groups: GroupSpec::new(),
//! };
//! assert!(spec.groups.is_empty());
//! ```

pub use crate::input::{InputField, InputSource, ParamLocation, Selector, SourceBinding};
pub use crate::response::ResponseItem;
pub use crate::type_node::TypeNode;
pub use crate::types::{
    ApiSpec, GroupSpec, OperationKind, OperationSpec, OutputFormatter, RestMethod,
};
