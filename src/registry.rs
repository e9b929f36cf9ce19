//! Operation registry: the validated document plus one loader per known
//! family.
//!
//! Lifecycle:
//! Uninitialized -> ConfigLoaded -> LoadersRegistered -> Compiling -> Done
//!
//! Only the first step can fail. After `LoadersRegistered` the registry is
//! read-only apart from its state marker.

use crate::compiler::{AotCompiler, CompilerContext};
use crate::config::{ConfigDocument, ConfigSource};
use crate::error::PreloadError;
use crate::loader::OpLoader;
use crate::preload;
use crate::report::PreloadReport;
use crate::rules::FAMILIES;

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    Uninitialized,
    ConfigLoaded,
    LoadersRegistered,
    Compiling,
    Done,
}

#[derive(Debug)]
pub struct OperationRegistry {
    document: ConfigDocument,
    loaders: HashMap<&'static str, OpLoader>,
    state: RegistryState,
}

impl OperationRegistry {
    /// Load and validate the config, then register every known family.
    pub fn new(source: ConfigSource) -> Result<Self, PreloadError> {
        tracing::debug!(state = ?RegistryState::Uninitialized, "building operation registry");
        let document = ConfigDocument::parse(source)?;
        Ok(Self::from_document(document))
    }

    pub fn from_document(document: ConfigDocument) -> Self {
        let mut registry = Self {
            document,
            loaders: HashMap::new(),
            state: RegistryState::ConfigLoaded,
        };
        tracing::debug!(
            operations = registry.document.len(),
            state = ?registry.state,
            "preload config loaded"
        );
        registry.init_loader_map();
        registry
    }

    fn init_loader_map(&mut self) {
        self.loaders = FAMILIES.iter().map(|def| (def.name, OpLoader::new(def))).collect();
        self.advance(RegistryState::LoadersRegistered);
    }

    fn advance(&mut self, next: RegistryState) {
        tracing::debug!(from = ?self.state, to = ?next, "registry state");
        self.state = next;
    }

    pub fn state(&self) -> RegistryState {
        self.state
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn loader(&self, name: &str) -> Option<&OpLoader> {
        self.loaders.get(name)
    }

    pub fn loader_count(&self) -> usize {
        self.loaders.len()
    }

    /// Compile every entry once. A second call is a no-op that returns an
    /// empty report.
    pub fn preload<C: AotCompiler>(
        &mut self,
        compiler: &mut C,
        ctx: &mut CompilerContext,
    ) -> PreloadReport {
        if self.state != RegistryState::LoadersRegistered {
            tracing::warn!(state = ?self.state, "preload already ran, skipping");
            return PreloadReport::default();
        }
        self.advance(RegistryState::Compiling);
        let report = preload::run(self, compiler, ctx);
        self.advance(RegistryState::Done);
        report
    }

    /// Validate and build every entry without compiling anything.
    pub fn check(&self) -> PreloadReport {
        preload::check(self)
    }
}
