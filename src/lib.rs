//! Operation preload: read a JSON list of tensor operations, validate each
//! preload entry against its operator family's rules, and hand the built
//! descriptors to an ahead-of-time compiler so the kernels are cached before
//! first use.
//!
//! ```no_run
//! use op_preload::{CompilerContext, ConfigSource, DryRunCompiler, OperationRegistry};
//!
//! let mut registry = OperationRegistry::new(ConfigSource::Path("preload.json".into()))?;
//! let mut compiler = DryRunCompiler::new();
//! let report = registry.preload(&mut compiler, &mut CompilerContext::new());
//! println!("{} entries compiled", report.totals.succeeded);
//! # Ok::<(), op_preload::PreloadError>(())
//! ```

pub mod compiler;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod loader;
pub mod parse;
pub mod preload;
pub mod registry;
pub mod report;
pub mod rules;

pub use compiler::{AotCompiler, CompilerContext, DryRunCompiler, JitMode};
pub use config::{ConfigDocument, ConfigSource, OperationEntry, PreloadEntry};
pub use descriptor::{AttrValue, AttributeSet, CompileCall, DataType, OperatorDescriptor, TensorDesc};
pub use error::{
    BuildError, CompileError, EntryError, ParseError, PreloadError, SchemaError, Stage,
    ValidationError,
};
pub use loader::OpLoader;
pub use registry::{OperationRegistry, RegistryState};
pub use report::{EntryOutcome, EntryRecord, PreloadReport, PreloadTotals};

pub type Result<T> = anyhow::Result<T>;
