//! Option Cascade - hierarchical, tag-aware option resolution
//!
//! Items form a tree (a page holding plots, each holding a legend and a
//! container of series). Every item resolves each option its kind declares
//! from, in decreasing priority: the value set on the item, values set on
//! tag-selected templates of its class, of its ancestors' templates and of
//! its container, the value inherited from its parent, the value of another
//! option it defers to, and finally the option's default.
//!
//! # Example
//!
//! ```rust
//! use option_cascade::{plotting, Value};
//!
//! let mut model = plotting::model();
//! model.class_mut("series")?.set([("color", "black")]);
//!
//! let mut page = model.create("page")?;
//! let plot = page.container_mut("plots")?.add_tagged("alpha");
//! plot.container_mut("series")?.add_tagged("measured");
//! plot.container_mut("series")?
//!     .add_tagged("fit")
//!     .set([("lineStyle", "dashed")]);
//!
//! let resolved = model.resolve(&page)?;
//! let fit = resolved.find("page.plots[0].series[1]").unwrap();
//! assert_eq!(fit["markerFillColor"], Value::from("black"));
//! assert_eq!(fit["lineStyle"], Value::from("dashed"));
//! # Ok::<(), option_cascade::CascadeError>(())
//! ```

pub mod definition;
pub mod diagnostic;
pub mod error;
pub mod model;
pub mod options;
pub mod plotting;
pub mod resolve;
pub mod selector;
pub mod stylesheet;
pub mod tag;
pub mod value;

pub use definition::Definition;
pub use diagnostic::{Diagnostic, DiagnosticCategory};
pub use error::{CascadeError, ConfigError, ParseError};
pub use model::{Item, ItemContainer, ItemId, ItemKind, KindDef, Model, ModelBuilder, TemplateRegistry};
pub use options::{OptionEntry, OptionStore, Schema};
pub use resolve::{ResolveConfig, ResolvedItem, ResolvedOptions};
pub use selector::SelectorPath;
pub use stylesheet::Stylesheet;
pub use tag::{Tag, TagSpec};
pub use value::{OptionMap, Value};

/// Build a model from a kind definition and apply stylesheets in order
///
/// Returns the model together with the diagnostics of every stylesheet.
pub fn load(
    definition: &str,
    stylesheets: &[&str],
) -> Result<(Model, Vec<Diagnostic>), ConfigError> {
    let mut model = Definition::from_str(definition)?.build()?;
    let mut diagnostics = Vec::new();
    for source in stylesheets {
        let sheet = Stylesheet::from_str(source)?;
        diagnostics.extend(sheet.apply(&mut model)?);
    }
    Ok((model, diagnostics))
}
