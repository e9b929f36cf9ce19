//! Boundary to the external AOT operator compiler.
//!
//! The compiler's JIT mode is process-wide state. It lives in a
//! `CompilerContext` that the preload loop owns and hands to each call, so a
//! mode switch and the call that depends on it cannot interleave with another
//! caller.

use crate::descriptor::{CompileCall, TensorDesc};
use crate::error::CompileError;

use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JitMode {
    /// Compile for the exact shapes in the descriptor.
    Enable,
    /// Compile a shape-generic kernel.
    Disable,
}

impl JitMode {
    pub fn for_call(dynamic_shape: bool) -> Self {
        if dynamic_shape {
            JitMode::Disable
        } else {
            JitMode::Enable
        }
    }
}

#[derive(Debug)]
pub struct CompilerContext {
    mode: JitMode,
    switches: usize,
}

impl Default for CompilerContext {
    fn default() -> Self {
        Self {
            mode: JitMode::Enable,
            switches: 0,
        }
    }
}

impl CompilerContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> JitMode {
        self.mode
    }

    /// Number of times the mode actually changed.
    pub fn switches(&self) -> usize {
        self.switches
    }

    pub fn set_mode(&mut self, mode: JitMode) {
        if self.mode != mode {
            tracing::debug!(from = ?self.mode, to = ?mode, "switching compiler JIT mode");
            self.mode = mode;
            self.switches += 1;
        }
    }
}

pub trait AotCompiler {
    /// Compile and cache one kernel. `ctx` already carries the mode for
    /// this call.
    fn compile(&mut self, ctx: &CompilerContext, call: &CompileCall) -> Result<(), CompileError>;
}

/// What a `DryRunCompiler` saw for one call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedCall {
    pub family_id: String,
    pub inputs: Vec<TensorDesc>,
    pub outputs: Vec<TensorDesc>,
    pub attrs: usize,
    pub mode: JitMode,
}

/// In-memory compiler that records calls instead of producing kernels.
/// Family ids passed to `reject` fail, everything else succeeds.
#[derive(Debug, Default)]
pub struct DryRunCompiler {
    rejected: HashSet<String>,
    calls: Vec<RecordedCall>,
}

impl DryRunCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(mut self, family_id: impl Into<String>) -> Self {
        self.rejected.insert(family_id.into());
        self
    }

    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }
}

impl AotCompiler for DryRunCompiler {
    fn compile(&mut self, ctx: &CompilerContext, call: &CompileCall) -> Result<(), CompileError> {
        if self.rejected.contains(call.family_id) {
            return Err(CompileError::Rejected {
                family_id: call.family_id.to_string(),
                reason: "unsupported on this device".to_string(),
            });
        }
        self.calls.push(RecordedCall {
            family_id: call.family_id.to_string(),
            inputs: call.descriptor.inputs.clone(),
            outputs: call.descriptor.outputs.clone(),
            attrs: call.descriptor.attrs.len(),
            mode: ctx.mode(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{AttributeSet, OperatorDescriptor};

    fn call(family_id: &'static str) -> CompileCall {
        CompileCall {
            family_id,
            descriptor: OperatorDescriptor {
                inputs: Vec::new(),
                outputs: Vec::new(),
                attrs: AttributeSet::none(),
            },
            dynamic_shape: false,
        }
    }

    #[test]
    fn context_counts_real_switches() {
        let mut ctx = CompilerContext::new();
        ctx.set_mode(JitMode::Enable);
        assert_eq!(ctx.switches(), 0);
        ctx.set_mode(JitMode::Disable);
        ctx.set_mode(JitMode::Disable);
        ctx.set_mode(JitMode::Enable);
        assert_eq!(ctx.switches(), 2);
    }

    #[test]
    fn dry_run_records_mode_and_rejects() {
        let mut compiler = DryRunCompiler::new().reject("Pow");
        let mut ctx = CompilerContext::new();
        ctx.set_mode(JitMode::Disable);
        assert!(compiler.compile(&ctx, &call("Add")).is_ok());
        assert!(matches!(
            compiler.compile(&ctx, &call("Pow")),
            Err(CompileError::Rejected { .. })
        ));
        assert_eq!(compiler.calls().len(), 1);
        assert_eq!(compiler.calls()[0].mode, JitMode::Disable);
    }
}
