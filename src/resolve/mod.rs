//! Tree resolution
//!
//! Resolution walks a real item tree top-down. For every item it gathers the
//! applicable templates, resolves the item's own options against them and
//! the parent's resolved values, and then hands each child the matching
//! parts of those templates:
//!
//! 1. class templates of the item's kind matching its tags (lowest),
//! 2. templates propagated from the ancestors' applicable templates,
//! 3. templates of the real container holding the item matching its tags
//!    (highest).
//!
//! For a child item the propagated templates are the same-named child of
//! every applicable template of the parent. For an item in a container they
//! are the matches, against the item's own tags, in the same-named container
//! of every applicable template of the parent.

mod config;

pub use config::ResolveConfig;

use std::ops::Index;

use indexmap::IndexMap;

use crate::diagnostic::Diagnostic;
use crate::error::CascadeError;
use crate::model::{Child, Item, ItemId, Model, TemplateRegistry};
use crate::options::OptionStore;
use crate::tag::Tag;
use crate::value::{OptionMap, Value};

/// Resolved options of one item
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedItem {
    /// Location in the tree, e.g. `page.plots[0].series[2]`
    pub path: String,
    pub options: OptionMap,
}

/// The resolved option map of every item of a tree, in pre-order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedOptions {
    items: IndexMap<ItemId, ResolvedItem>,
    diagnostics: Vec<Diagnostic>,
}

impl ResolvedOptions {
    /// Resolved options of `item`, if it was part of the resolved tree
    pub fn get(&self, item: &Item) -> Option<&OptionMap> {
        self.get_by_id(item.id())
    }

    pub fn get_by_id(&self, id: ItemId) -> Option<&OptionMap> {
        self.items.get(&id).map(|resolved| &resolved.options)
    }

    /// Resolved value of one option of `item`
    pub fn value(&self, item: &Item, option: &str) -> Option<&Value> {
        self.get(item)?.get(option)
    }

    pub fn path_of(&self, item: &Item) -> Option<&str> {
        self.items.get(&item.id()).map(|resolved| resolved.path.as_str())
    }

    /// Resolved options of the item at `path`
    pub fn find(&self, path: &str) -> Option<&OptionMap> {
        self.items
            .values()
            .find(|resolved| resolved.path == path)
            .map(|resolved| &resolved.options)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &ResolvedItem)> {
        self.items.iter().map(|(id, resolved)| (*id, resolved))
    }

    /// Diagnostics noticed while resolving
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl Index<&Item> for ResolvedOptions {
    type Output = OptionMap;

    fn index(&self, item: &Item) -> &OptionMap {
        &self.items[&item.id()].options
    }
}

impl Model {
    /// Resolve the options of every item in the tree rooted at `root`
    pub fn resolve(&self, root: &Item) -> Result<ResolvedOptions, CascadeError> {
        self.resolve_with(root, &ResolveConfig::default())
    }

    pub fn resolve_with(
        &self,
        root: &Item,
        config: &ResolveConfig,
    ) -> Result<ResolvedOptions, CascadeError> {
        self.resolve_subtree(root, &[], &OptionMap::new(), config)
    }

    /// Resolve a subtree as if it hung below a parent
    ///
    /// `inbound` are templates propagated from the parent, in ascending
    /// priority; `inherited` are the parent's resolved options.
    pub fn resolve_subtree(
        &self,
        root: &Item,
        inbound: &[&Item],
        inherited: &OptionMap,
        config: &ResolveConfig,
    ) -> Result<ResolvedOptions, CascadeError> {
        tracing::debug!(root = %root.kind_name(), "resolving options");
        let mut resolver = Resolver {
            model: self,
            config,
            out: ResolvedOptions::default(),
        };
        resolver.resolve_item(
            root,
            root.kind_name().to_string(),
            inbound.to_vec(),
            None,
            inherited,
        )?;
        tracing::debug!(
            items = resolver.out.len(),
            diagnostics = resolver.out.diagnostics.len(),
            "resolved options"
        );
        Ok(resolver.out)
    }
}

impl Item {
    /// Resolve the options of this item and all its descendants
    pub fn resolve_options(&self, model: &Model) -> Result<ResolvedOptions, CascadeError> {
        model.resolve(self)
    }

    pub fn resolve_options_with(
        &self,
        model: &Model,
        config: &ResolveConfig,
    ) -> Result<ResolvedOptions, CascadeError> {
        model.resolve_with(self, config)
    }
}

struct Resolver<'m> {
    model: &'m Model,
    config: &'m ResolveConfig,
    out: ResolvedOptions,
}

impl<'m> Resolver<'m> {
    fn resolve_item(
        &mut self,
        item: &'m Item,
        path: String,
        inbound: Vec<&'m Item>,
        container: Option<&'m TemplateRegistry>,
        inherited: &OptionMap,
    ) -> Result<(), CascadeError> {
        let model = self.model;
        let class = model.class(item.kind_name())?;

        let mut applicable = self.matching(class, item.tags(), &path);
        applicable.extend(inbound);
        if let Some(registry) = container {
            applicable.extend(self.matching(registry, item.tags(), &path));
        }

        let stores: Vec<&OptionStore> = applicable.iter().map(|t| t.options()).collect();
        let mut resolved = item.options().resolve(&stores, inherited)?;
        tracing::trace!(path = %path, templates = applicable.len(), "resolved item");

        if self.config.unknown_option_diagnostics {
            for name in item.options().unknown_names() {
                self.report(Diagnostic::unknown_option(path.as_str(), name));
            }
        }

        // Reserve the slot so the output stays in pre-order
        self.out.items.insert(
            item.id(),
            ResolvedItem {
                path: path.clone(),
                options: OptionMap::new(),
            },
        );

        for (index, (slot, child)) in item.kind().slots().iter().zip(item.children()).enumerate() {
            match child {
                Child::Item(child) => {
                    let inbound = applicable
                        .iter()
                        .filter_map(|t| t.child_at(index))
                        .collect();
                    let child_path = format!("{}.{}", path, slot.name());
                    self.resolve_item(child, child_path, inbound, None, &resolved)?;
                }
                Child::Container(real) => {
                    for (position, member) in real.items().iter().enumerate() {
                        let member_path = format!("{}.{}[{}]", path, slot.name(), position);
                        let mut inbound = Vec::new();
                        for template in &applicable {
                            if let Some(scoped) = template.container_at(index) {
                                inbound.extend(self.matching(
                                    scoped.templates(),
                                    member.tags(),
                                    &member_path,
                                ));
                            }
                        }
                        self.resolve_item(
                            member,
                            member_path,
                            inbound,
                            Some(real.templates()),
                            &resolved,
                        )?;
                    }
                }
            }
        }

        if self.config.prune_unspecified {
            resolved.retain(|_, value| !value.is_unspecified());
        }
        if let Some(entry) = self.out.items.get_mut(&item.id()) {
            entry.options = resolved;
        }
        Ok(())
    }

    /// Templates of `registry` matching `tags`, reporting ambiguous selectors
    fn matching<'r>(
        &mut self,
        registry: &'r TemplateRegistry,
        tags: &[Tag],
        path: &str,
    ) -> Vec<&'r Item> {
        if self.config.ambiguity_diagnostics {
            for conflict in registry.conflicts(tags) {
                let selectors: Vec<&str> = conflict.selectors.iter().map(String::as_str).collect();
                self.report(Diagnostic::ambiguous_selectors(
                    path,
                    &conflict.option,
                    &selectors,
                ));
            }
        }
        registry.matching_templates(tags)
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
        self.out.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticCategory;
    use crate::model::KindDef;
    use crate::options::OptionEntry;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn model() -> Model {
        Model::builder()
            .kind(
                KindDef::new("plot")
                    .option("a", OptionEntry::with_default(0).inherited())
                    .child("legend", "legend")
                    .container("series", "series"),
            )
            .kind(KindDef::new("legend").option("a", OptionEntry::with_default(0).inherited()))
            .kind(
                KindDef::new("series")
                    .option("a", OptionEntry::with_default(0).inherited())
                    .option("b", OptionEntry::new()),
            )
            .build()
            .expect("Should build")
    }

    fn plot_with_series(model: &Model, tags: &[&str]) -> Item {
        let mut plot = model.create("plot").expect("plot");
        let series = plot.container_mut("series").expect("series");
        for tags in tags {
            series.add_tagged(*tags);
        }
        plot
    }

    #[test]
    fn test_paths_in_pre_order() {
        let model = model();
        let plot = plot_with_series(&model, &["", ""]);
        let resolved = plot.resolve_options(&model).expect("Should resolve");
        let paths: Vec<&str> = resolved.iter().map(|(_, r)| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["plot", "plot.legend", "plot.series[0]", "plot.series[1]"]
        );
    }

    #[test]
    fn test_container_template_beats_class_template() {
        let mut model = model();
        model.class_mut("series").expect("series").set([("a", 1)]);
        let mut plot = plot_with_series(&model, &["one", "two"]);
        plot.container_mut("series")
            .expect("series")
            .select("one")
            .set([("a", 2)]);

        let resolved = model.resolve(&plot).expect("Should resolve");
        assert_eq!(resolved.find("plot.series[0]").map(|o| &o["a"]), Some(&Value::Int(2)));
        assert_eq!(resolved.find("plot.series[1]").map(|o| &o["a"]), Some(&Value::Int(1)));
    }

    #[test]
    fn test_child_item_receives_template_child() {
        let mut model = model();
        model
            .select_path("plot[alpha].legend")
            .expect("Should select")
            .set([("a", 5)]);

        let alpha = model.create_tagged("plot", "alpha").expect("plot");
        let plain = model.create("plot").expect("plot");

        let resolved = model.resolve(&alpha).expect("Should resolve");
        assert_eq!(resolved.find("plot.legend").map(|o| &o["a"]), Some(&Value::Int(5)));
        assert_eq!(resolved.find("plot").map(|o| &o["a"]), Some(&Value::Int(0)));

        let resolved = model.resolve(&plain).expect("Should resolve");
        assert_eq!(resolved.find("plot.legend").map(|o| &o["a"]), Some(&Value::Int(0)));
    }

    #[test]
    fn test_prune_unspecified() {
        let model = model();
        let plot = plot_with_series(&model, &[""]);
        let series = plot.container("series").expect("series").items()[0].id();

        let resolved = model.resolve(&plot).expect("Should resolve");
        assert_eq!(resolved.get_by_id(series).map(|o| o.len()), Some(2));

        let config = ResolveConfig::new().with_prune_unspecified(true);
        let resolved = model.resolve_with(&plot, &config).expect("Should resolve");
        assert_eq!(resolved.get_by_id(series).map(|o| o.len()), Some(1));
    }

    #[test]
    fn test_unknown_option_diagnostics() {
        let model = model();
        let mut plot = plot_with_series(&model, &[""]);
        plot.set([("colour", "red")]);

        let resolved = model.resolve(&plot).expect("Should resolve");
        assert_eq!(resolved.diagnostics().len(), 1);
        assert_eq!(resolved.diagnostics()[0].category, DiagnosticCategory::UnknownOption);
        assert_eq!(resolved.diagnostics()[0].subject, "plot");

        let config = ResolveConfig::new().quiet();
        let resolved = model.resolve_with(&plot, &config).expect("Should resolve");
        assert!(resolved.diagnostics().is_empty());
    }

    #[test]
    fn test_ambiguity_diagnostics() {
        let mut model = model();
        model.class_mut("series").expect("series").select("one").set([("a", 1)]);
        model.class_mut("series").expect("series").select("two").set([("a", 2)]);
        let plot = plot_with_series(&model, &["one,two", "one"]);

        let resolved = model.resolve(&plot).expect("Should resolve");
        // Later-created templates win
        assert_eq!(resolved.find("plot.series[0]").map(|o| &o["a"]), Some(&Value::Int(2)));
        insta::assert_snapshot!(
            resolved.diagnostics().iter().map(|d| d.to_string()).collect::<Vec<_>>().join("\n"),
            @"plot.series[0] [ambiguous-selectors]: option a is set differently by templates [one], [two]; the last one wins"
        );
    }

    #[test]
    fn test_quoted_selector_matches_tag_with_quote() {
        let mut model = model();
        model
            .select_path(r#"series["a\"b"]"#)
            .expect("Should select")
            .set([("b", 1)]);
        let plot = plot_with_series(&model, &["a\"b", "ab"]);

        let resolved = model.resolve(&plot).expect("Should resolve");
        assert_eq!(resolved.find("plot.series[0]").map(|o| &o["b"]), Some(&Value::Int(1)));
        assert_eq!(
            resolved.find("plot.series[1]").map(|o| &o["b"]),
            Some(&Value::Unspecified)
        );
    }

    #[test]
    fn test_numeric_tag_selector() {
        let mut model = model();
        model
            .select_path("plot.series[2020]")
            .expect("Should select")
            .set([("b", "old")]);
        let plot = plot_with_series(&model, &["2020", "2021"]);

        let resolved = model.resolve(&plot).expect("Should resolve");
        assert_eq!(
            resolved.find("plot.series[0]").map(|o| &o["b"]),
            Some(&Value::from("old"))
        );
        assert_eq!(
            resolved.find("plot.series[1]").map(|o| &o["b"]),
            Some(&Value::Unspecified)
        );
    }

    #[test]
    fn test_unknown_options_from_construction_surface_on_resolve() {
        let model = model();
        let mut plot = model
            .create_with("plot", [("colour", Value::from("red"))])
            .expect("plot");
        plot.container_mut("series")
            .expect("series")
            .add_with([("width", 2)])
            .expect("series");

        let resolved = model.resolve(&plot).expect("Should resolve");
        let subjects: Vec<&str> = resolved
            .diagnostics()
            .iter()
            .map(|d| d.subject.as_str())
            .collect();
        assert_eq!(subjects, vec!["plot", "plot.series[0]"]);
        assert!(resolved
            .diagnostics()
            .iter()
            .all(|d| d.category == DiagnosticCategory::UnknownOption));
    }

    /// Counts warn-level events
    struct WarnCounter(Arc<AtomicUsize>);

    impl tracing::Subscriber for WarnCounter {
        fn enabled(&self, _: &tracing::Metadata<'_>) -> bool {
            true
        }
        fn new_span(&self, _: &tracing::span::Attributes<'_>) -> tracing::span::Id {
            tracing::span::Id::from_u64(1)
        }
        fn record(&self, _: &tracing::span::Id, _: &tracing::span::Record<'_>) {}
        fn record_follows_from(&self, _: &tracing::span::Id, _: &tracing::span::Id) {}
        fn event(&self, event: &tracing::Event<'_>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
        fn enter(&self, _: &tracing::span::Id) {}
        fn exit(&self, _: &tracing::span::Id) {}
    }

    #[test]
    fn test_diagnostics_are_logged_only_when_reported() {
        let model = model();
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = WarnCounter(Arc::clone(&warnings));

        tracing::subscriber::with_default(subscriber, || {
            let mut plot = model.create("plot").expect("plot");
            let diagnostics = plot.set([("colour", "red")]);
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(warnings.load(Ordering::SeqCst), 0);

            model
                .resolve_with(&plot, &ResolveConfig::new().quiet())
                .expect("Should resolve");
            assert_eq!(warnings.load(Ordering::SeqCst), 0);

            model.resolve(&plot).expect("Should resolve");
            assert_eq!(warnings.load(Ordering::SeqCst), 1);
        });
    }

    #[test]
    fn test_resolve_subtree_uses_inbound_and_inherited() {
        let mut model = model();
        model.class_mut("series").expect("series").select("t").set([("b", "x")]);
        let template = model
            .class("series")
            .expect("series")
            .get("t")
            .expect("template");
        let series = model.create("series").expect("series");
        let inherited: OptionMap = [("a".to_string(), Value::Int(7))].into_iter().collect();

        let resolved = model
            .resolve_subtree(&series, &[template], &inherited, &ResolveConfig::default())
            .expect("Should resolve");
        assert_eq!(resolved[&series]["a"], Value::Int(7));
        assert_eq!(resolved[&series]["b"], Value::from("x"));
    }

    #[test]
    fn test_item_from_other_model_is_rejected() {
        let model = model();
        let other = Model::builder()
            .kind(KindDef::new("axis"))
            .build()
            .expect("Should build");
        let axis = other.create("axis").expect("axis");
        assert!(matches!(
            model.resolve(&axis),
            Err(CascadeError::UnknownKind { .. })
        ));
    }
}
