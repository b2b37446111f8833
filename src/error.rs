//! Error types for the fallible edges of the crate.
//!
//! The interaction core (store, controllers, router) never fails: every trigger
//! is accepted in every state. Errors only come from reading configuration,
//! decoding textures, and bootstrapping the window.

use std::path::PathBuf;

/// Failure while loading a [`PortfolioConfig`](crate::PortfolioConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML for the expected schema.
    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// A periodic setting must be a positive, finite number of seconds.
    #[error("config '{path}': {field} must be positive, got {value}")]
    NonPositiveInterval {
        path: PathBuf,
        field: &'static str,
        value: f32,
    },
}

/// Failure while decoding a prop texture.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Failure while bringing up the GPU for a window.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Failure while starting the windowed application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
}
