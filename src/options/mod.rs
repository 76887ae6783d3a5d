//! Option schemas and stores
//!
//! A [`Schema`] lists the option names an item kind understands, each with
//! its fallback metadata. An [`OptionStore`] holds the values explicitly set
//! on one item or template and resolves them against templates, inherited
//! values, deferrals and defaults.

mod schema;
mod store;

pub use schema::{OptionEntry, Schema};
pub use store::OptionStore;
