//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, tile service
//! creation and file I/O so the command handlers stay small.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cartostyle::config::ConfigFile;
use cartostyle::log::TracingLogger;
use cartostyle::logging::{init_logging, LoggingGuard};
use cartostyle::render::{NativeRenderEngine, TileRenderer};
use cartostyle::request::TileService;
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    pub fn new() -> Result<Self, CliError> {
        Self::with_debug(false)
    }

    /// Create a new CLI runner with optional debug logging.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = ConfigFile::load()?;

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| cartostyle::logging::default_log_file().to_string());

        // Commands print their own results to stdout; log lines go to the file
        let logging_guard = init_logging(&log_dir, &log_file, false, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("Cartostyle v{}", cartostyle::VERSION);
        info!("Cartostyle CLI: {} command", command);
    }

    /// Load the native engine and wrap it in a tile service.
    ///
    /// `library` and `resource_dir` override the `[engine]` section.
    pub fn create_service(
        &self,
        library: Option<PathBuf>,
        resource_dir: Option<PathBuf>,
    ) -> Result<TileService, CliError> {
        let engine_settings = &self.config.engine;
        let library = library
            .or_else(|| engine_settings.library.clone())
            .ok_or_else(|| {
                CliError::Config(
                    "No render engine configured. \
                     Set [engine] library in config.ini or use --library"
                        .to_string(),
                )
            })?;
        let resource_dir = resource_dir.unwrap_or_else(|| engine_settings.resource_dir.clone());

        info!("Loading render engine from {}", library.display());
        let engine = NativeRenderEngine::load(&library)
            .map_err(CliError::Engine)?
            .with_reentrant(engine_settings.reentrant);

        // Use TracingLogger to delegate library logging to tracing crate
        let logger = Arc::new(TracingLogger);

        let renderer = TileRenderer::new(Arc::new(engine))
            .with_row_order(engine_settings.row_order)
            .with_logger(logger.clone());

        let service = TileService::new(renderer, resource_dir, self.config.render.clone())
            .with_logger(logger);
        info!("Service created successfully");
        Ok(service)
    }

    /// Read a UTF-8 input file.
    pub fn read_input(&self, path: &Path) -> Result<String, CliError> {
        std::fs::read_to_string(path).map_err(|e| CliError::file_read(path, e))
    }

    /// Write an output file, reporting its size.
    pub fn write_output(&self, path: &Path, data: &[u8]) -> Result<(), CliError> {
        std::fs::write(path, data).map_err(|e| CliError::file_write(path, e))?;

        info!("Wrote {} ({} bytes)", path.display(), data.len());
        println!("✓ Wrote {} ({} bytes)", path.display(), data.len());
        Ok(())
    }
}
