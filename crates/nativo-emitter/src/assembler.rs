//! Program assembler.
//!
//! Selects the types to translate, fixes the global declaration order, runs
//! the sequential declaration pass, fans the body pass out over a rayon pool
//! (one unit per type) and joins the fragments in metadata order. Finally it
//! appends the process entry procedure.

use nativo_common::{Location, SourceWriter, TranslateError, TranslateErrorKind};
use nativo_metadata::graph::{ROOT_ENUM_TYPE, ROOT_REFERENCE_TYPE, ROOT_VALUE_TYPE};
use nativo_metadata::signature::VOID;
use nativo_metadata::{AssemblyGraph, TypeDef};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, warn};

use crate::declarations::{DeclarationEmitter, Declarations, Registry};
use crate::definitions::emit_type_definitions;
use crate::options::TranslateOptions;

const MODULE_TYPE: &str = "<Module>";
const ATTRIBUTE_ROOT: &str = "System.Attribute";
const ATTRIBUTE_SUFFIX: &str = "Attribute";

/// Both artifacts of one translation.
#[derive(Debug, Clone)]
pub struct Translation {
    /// Declarations (`.hpp`).
    pub header: String,
    /// Definitions (`.cpp`), including the header by name.
    pub source: String,
    pub type_count: usize,
    pub registry: Registry,
}

/// Types that get translated, in metadata order: everything except the
/// module pseudo-type, `System.Void` and attribute types.
pub fn select_types(graph: &AssemblyGraph) -> Vec<&TypeDef> {
    graph
        .types()
        .iter()
        .filter(|ty| {
            let full_name = ty.full_name();
            full_name != MODULE_TYPE
                && full_name != VOID
                && !ty.name.ends_with(ATTRIBUTE_SUFFIX)
                && !graph.derives_from(ty, ATTRIBUTE_ROOT)
        })
        .collect()
}

/// Global declaration order: the reference root, the value-type root, the
/// enumeration root, then every other type in metadata order. A class whose
/// base comes later in metadata order waits until right after its base.
pub fn declaration_order<'g>(graph: &AssemblyGraph, selected: &[&'g TypeDef]) -> Vec<&'g TypeDef> {
    let names: FxHashSet<String> = selected.iter().map(|ty| ty.full_name()).collect();
    let mut order: Vec<&'g TypeDef> = Vec::with_capacity(selected.len());
    let mut placed: FxHashSet<String> = FxHashSet::default();
    let mut waiting: FxHashMap<String, Vec<&'g TypeDef>> = FxHashMap::default();

    for root in [ROOT_REFERENCE_TYPE, ROOT_VALUE_TYPE, ROOT_ENUM_TYPE] {
        if let Some(&ty) = selected.iter().find(|ty| ty.full_name() == root) {
            order.push(ty);
            placed.insert(root.to_string());
        }
    }

    for &ty in selected {
        let full_name = ty.full_name();
        if placed.contains(&full_name) {
            continue;
        }
        let pending_base = ty.base.as_ref().filter(|base| {
            !graph.is_value_type(ty) && names.contains(*base) && !placed.contains(*base)
        });
        if let Some(base) = pending_base {
            debug!(ty = %full_name, base = %base, "deferred until base is declared");
            waiting.entry(base.clone()).or_default().push(ty);
            continue;
        }

        let mut ready = vec![ty];
        while let Some(next) = ready.pop() {
            let next_name = next.full_name();
            order.push(next);
            if let Some(mut dependents) = waiting.remove(&next_name) {
                // Popped from the back, so reverse to keep metadata order.
                dependents.reverse();
                ready.extend(dependents);
            }
            placed.insert(next_name);
        }
    }

    // Anything left waits on a base cycle; keep it in metadata order.
    if !waiting.is_empty() {
        for &ty in selected {
            if !placed.contains(&ty.full_name()) {
                order.push(ty);
            }
        }
    }
    order
}

/// Translate the whole assembly. `header_name` is the file name the
/// definitions artifact includes.
#[tracing::instrument(level = "debug", skip_all, fields(assembly = graph.name()))]
pub fn translate(
    graph: &AssemblyGraph,
    header_name: &str,
    options: &TranslateOptions,
) -> Result<Translation, TranslateError> {
    let selected = select_types(graph);
    let ordered = declaration_order(graph, &selected);

    let Declarations { header, registry } =
        DeclarationEmitter::new(graph, &ordered).emit(&ordered)?;
    if registry.entrypoint.is_none() {
        return Err(TranslateError::new(
            TranslateErrorKind::MissingEntrypoint,
            Location::default(),
        ));
    }

    let fragments = run_body_pass(graph, &selected, options);

    let capacity: usize = fragments
        .iter()
        .map(|fragment| fragment.as_ref().map_or(0, String::len))
        .sum();
    let mut writer = SourceWriter::with_capacity(capacity + 256);
    writer.line(&format!("#include \"{header_name}\""));
    writer.write_line();
    // Index order, so the reported error is the first failing type in
    // metadata order no matter which unit finished first.
    for fragment in fragments {
        writer.append(&fragment?);
    }
    emit_bootstrap(&mut writer, &registry)?;
    let source = writer.finish();

    info!(
        types = selected.len(),
        header_bytes = header.len(),
        source_bytes = source.len(),
        "translated assembly"
    );
    Ok(Translation {
        header,
        source,
        type_count: selected.len(),
        registry,
    })
}

/// One definition fragment per type, in the order of `types`.
fn run_body_pass(
    graph: &AssemblyGraph,
    types: &[&TypeDef],
    options: &TranslateOptions,
) -> Vec<Result<String, TranslateError>> {
    let work = || {
        types
            .par_iter()
            .map(|ty| emit_type_definitions(graph, ty, options))
            .collect::<Vec<_>>()
    };

    match options.jobs {
        Some(jobs) => match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(work),
            Err(err) => {
                warn!(%err, jobs, "cannot build worker pool, using the global pool");
                work()
            }
        },
        None => work(),
    }
}

/// `int main()`: static initializers in registration order, then the
/// entrypoint.
pub fn emit_bootstrap(writer: &mut SourceWriter, registry: &Registry) -> Result<(), TranslateError> {
    let entrypoint = registry.entrypoint.as_ref().ok_or_else(|| {
        TranslateError::new(TranslateErrorKind::MissingEntrypoint, Location::default())
    })?;

    writer.line("int main() {");
    writer.increase_indent();
    for call in registry.static_initializer_calls() {
        writer.line(&format!("{call}();"));
    }
    if entrypoint.returns_void {
        writer.line(&format!("{}();", entrypoint.qualified_name()));
        writer.line("return 0;");
    } else {
        writer.line(&format!("return {}();", entrypoint.qualified_name()));
    }
    writer.decrease_indent();
    writer.line("}");
    Ok(())
}
