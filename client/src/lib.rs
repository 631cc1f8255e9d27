//! Terminal client for the shopping list API.
//!
//! [`view::ListView`] keeps the rendered collection and re-fetches it in full
//! after every successful mutation. [`api::HttpItemsApi`] is the HTTP transport.

pub mod api;
pub mod error;
pub mod view;

pub use api::{HttpItemsApi, ItemsApi};
pub use error::ClientError;
pub use view::ListView;
