//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{
    DataFetcher, InfoService, NotebookRenderer, PackageInstaller, SourceCloner,
};
use crate::config::Settings;
use crate::infrastructure::registry::PythonRegistry;
use crate::infrastructure::traits::{
    CommandRunner, FileSystem, RealCommandRunner, RealFileSystem, Registry,
};

/// Container holding the I/O boundaries shared by all services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,

    /// Plugin registry
    pub registry: Arc<dyn Registry>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let cmd: Arc<dyn CommandRunner> = Arc::new(RealCommandRunner);
        let registry = Arc::new(PythonRegistry::new(
            Arc::clone(&cmd),
            settings.tools.python.clone(),
        ));
        Self::with_deps(settings, Arc::new(RealFileSystem), cmd, registry)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        registry: Arc<dyn Registry>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            cmd,
            registry,
        }
    }

    pub fn notebook_renderer(&self) -> NotebookRenderer {
        NotebookRenderer::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.cmd),
            Arc::clone(&self.settings),
        )
    }

    pub fn source_cloner(&self) -> SourceCloner {
        SourceCloner::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.cmd),
            Arc::clone(&self.settings),
        )
    }

    pub fn package_installer(&self) -> PackageInstaller {
        PackageInstaller::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.cmd),
            Arc::clone(&self.settings),
        )
    }

    pub fn data_fetcher(&self) -> DataFetcher {
        DataFetcher::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.cmd),
            Arc::clone(&self.settings),
        )
    }

    pub fn info_service(&self) -> InfoService {
        InfoService::new(Arc::clone(&self.registry))
    }
}
