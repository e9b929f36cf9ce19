//! Best-effort warm-up loop over every operation and preload entry.
//!
//! Nothing in here returns an error: a bad entry is logged, recorded in the
//! report and skipped, and the loop moves on. A skipped entry only costs a
//! compile on first use at runtime.

use crate::compiler::{AotCompiler, CompilerContext, JitMode};
use crate::config::{OperationEntry, PreloadEntry};
use crate::error::EntryError;
use crate::loader::OpLoader;
use crate::parse::parse_entry;
use crate::registry::OperationRegistry;
use crate::report::{EntryOutcome, EntryRecord, PreloadReport};

use tracing::{info, warn};

/// Validate, build and compile every entry in document order.
pub fn run<C: AotCompiler>(
    registry: &OperationRegistry,
    compiler: &mut C,
    ctx: &mut CompilerContext,
) -> PreloadReport {
    info!(operations = registry.document().len(), "operation preload started");
    let report = walk(registry, |loader, op, entry| {
        compile_entry(loader, op, entry, &mut *compiler, &mut *ctx)
            .map(|calls| EntryOutcome::Compiled { calls })
    });
    info!(
        succeeded = report.totals.succeeded,
        skipped = report.totals.skipped,
        unknown = report.totals.unknown_operations,
        calls = report.totals.compile_calls,
        "operation preload finished"
    );
    report
}

/// Same walk as `run`, stopping short of the compiler.
pub fn check(registry: &OperationRegistry) -> PreloadReport {
    walk(registry, |loader, op, entry| {
        let parsed = parse_entry(entry)?;
        loader.validate(&parsed, &op.name)?;
        let calls = loader.build_calls(&parsed)?;
        Ok(EntryOutcome::Validated { calls: calls.len() })
    })
}

fn walk<F>(registry: &OperationRegistry, mut attempt: F) -> PreloadReport
where
    F: FnMut(&OpLoader, &OperationEntry, &PreloadEntry) -> Result<EntryOutcome, EntryError>,
{
    let doc = registry.document();
    let mut report = PreloadReport::default();

    for name in doc.all_names() {
        let Some(op) = doc.get_operation(name) else {
            continue;
        };
        report.note_operation();

        let Some(loader) = registry.loader(name) else {
            warn!(operation = %name, "no loader registered for operation, skipping");
            report.note_unknown(name);
            continue;
        };

        for (index, entry) in op.preload_list.iter().enumerate() {
            let outcome = match attempt(loader, op, entry) {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(
                        operation = %name,
                        index,
                        stage = %err.stage(),
                        error = %err,
                        "preload entry skipped"
                    );
                    EntryOutcome::Skipped {
                        stage: err.stage(),
                        reason: err.to_string(),
                        issued_calls: err.issued_calls(),
                    }
                }
            };
            report.push(EntryRecord {
                operation: name.clone(),
                index,
                family_id: loader.canonical(),
                outcome,
            });
        }
    }
    report
}

fn compile_entry<C: AotCompiler>(
    loader: &OpLoader,
    op: &OperationEntry,
    entry: &PreloadEntry,
    compiler: &mut C,
    ctx: &mut CompilerContext,
) -> Result<usize, EntryError> {
    let parsed = parse_entry(entry)?;
    loader.validate(&parsed, &op.name)?;
    let calls = loader.build_calls(&parsed)?;

    for (issued, call) in calls.iter().enumerate() {
        ctx.set_mode(JitMode::for_call(call.dynamic_shape));
        compiler
            .compile(ctx, call)
            .map_err(|source| EntryError::Compile { issued, source })?;
        info!(
            operation = %op.name,
            family = call.family_id,
            inputs = call.descriptor.inputs.len(),
            outputs = call.descriptor.outputs.len(),
            "kernel compiled"
        );
    }
    Ok(calls.len())
}
