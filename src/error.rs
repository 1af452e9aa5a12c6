//! Error types for the particle field.
//!
//! Configuration and surface errors are fatal and surface before the first
//! frame. Asset errors are logged and the affected shape falls back to a
//! circle.

use std::fmt;

/// Errors raised while reading or validating a configuration document.
#[derive(Debug)]
pub enum ConfigurationError {
    /// Failed to read the document from disk.
    Io(std::io::Error),
    /// Malformed JSON or a value of the wrong JSON type.
    Parse(serde_json::Error),
    /// A required field is absent.
    Missing { field: &'static str },
    /// A value outside the recognized set (enumerations, colors).
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
    /// A numeric field that must be non-negative.
    Negative { field: &'static str, value: f32 },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::Io(e) => write!(f, "Failed to read configuration: {}", e),
            ConfigurationError::Parse(e) => write!(f, "Failed to parse configuration: {}", e),
            ConfigurationError::Missing { field } => {
                write!(f, "Missing required field `{}`", field)
            }
            ConfigurationError::InvalidValue {
                field,
                value,
                expected,
            } => write!(
                f,
                "Invalid value {:?} for `{}` (expected {})",
                value, field, expected
            ),
            ConfigurationError::Negative { field, value } => {
                write!(f, "Field `{}` must be non-negative, got {}", field, value)
            }
        }
    }
}

impl std::error::Error for ConfigurationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigurationError::Io(e) => Some(e),
            ConfigurationError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigurationError {
    fn from(e: std::io::Error) -> Self {
        ConfigurationError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigurationError {
    fn from(e: serde_json::Error) -> Self {
        ConfigurationError::Parse(e)
    }
}

impl ConfigurationError {
    /// Dotted path of the offending field, when the error is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConfigurationError::Missing { field }
            | ConfigurationError::InvalidValue { field, .. }
            | ConfigurationError::Negative { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Errors raised while loading an image-shape asset.
#[derive(Debug)]
pub enum AssetLoadError {
    /// Failed to read the file.
    Io(std::io::Error),
    /// The file was read but could not be decoded.
    Decode(image::ImageError),
    /// Remote sources and formats without a decoder.
    Unsupported { src: String },
}

impl fmt::Display for AssetLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetLoadError::Io(e) => write!(f, "Failed to read image asset: {}", e),
            AssetLoadError::Decode(e) => write!(f, "Failed to decode image asset: {}", e),
            AssetLoadError::Unsupported { src } => {
                write!(f, "Unsupported image asset source: {}", src)
            }
        }
    }
}

impl std::error::Error for AssetLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetLoadError::Io(e) => Some(e),
            AssetLoadError::Decode(e) => Some(e),
            AssetLoadError::Unsupported { .. } => None,
        }
    }
}

impl From<std::io::Error> for AssetLoadError {
    fn from(e: std::io::Error) -> Self {
        AssetLoadError::Io(e)
    }
}

impl From<image::ImageError> for AssetLoadError {
    fn from(e: image::ImageError) -> Self {
        AssetLoadError::Decode(e)
    }
}

/// Errors raised while acquiring the window and drawable surface.
#[derive(Debug)]
pub enum SurfaceUnavailableError {
    /// Failed to create the window.
    Window(winit::error::OsError),
    /// Failed to create a GPU surface for the window.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No adapter can present to the surface.
    NoAdapter,
    /// Failed to create the GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// The adapter cannot configure the surface.
    Unsupported,
}

impl fmt::Display for SurfaceUnavailableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceUnavailableError::Window(e) => write!(f, "Failed to create window: {}", e),
            SurfaceUnavailableError::SurfaceCreation(e) => {
                write!(f, "Failed to create GPU surface: {}", e)
            }
            SurfaceUnavailableError::NoAdapter => {
                write!(f, "No GPU adapter can present to this window")
            }
            SurfaceUnavailableError::DeviceCreation(e) => {
                write!(f, "Failed to create GPU device: {}", e)
            }
            SurfaceUnavailableError::Unsupported => {
                write!(f, "Surface not supported by adapter")
            }
        }
    }
}

impl std::error::Error for SurfaceUnavailableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SurfaceUnavailableError::Window(e) => Some(e),
            SurfaceUnavailableError::SurfaceCreation(e) => Some(e),
            SurfaceUnavailableError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<winit::error::OsError> for SurfaceUnavailableError {
    fn from(e: winit::error::OsError) -> Self {
        SurfaceUnavailableError::Window(e)
    }
}

impl From<wgpu::CreateSurfaceError> for SurfaceUnavailableError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        SurfaceUnavailableError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for SurfaceUnavailableError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        SurfaceUnavailableError::DeviceCreation(e)
    }
}

/// Top-level errors returned from `main`.
#[derive(Debug)]
pub enum AppError {
    /// Failed to create or run the event loop.
    EventLoop(winit::error::EventLoopError),
    /// The configuration was rejected.
    Configuration(ConfigurationError),
    /// The drawable surface could not be acquired.
    Surface(SurfaceUnavailableError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EventLoop(e) => write!(f, "Event loop error: {}", e),
            AppError::Configuration(e) => write!(f, "Configuration error: {}", e),
            AppError::Surface(e) => write!(f, "Surface unavailable: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::EventLoop(e) => Some(e),
            AppError::Configuration(e) => Some(e),
            AppError::Surface(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(e: winit::error::EventLoopError) -> Self {
        AppError::EventLoop(e)
    }
}

impl From<ConfigurationError> for AppError {
    fn from(e: ConfigurationError) -> Self {
        AppError::Configuration(e)
    }
}

impl From<SurfaceUnavailableError> for AppError {
    fn from(e: SurfaceUnavailableError) -> Self {
        AppError::Surface(e)
    }
}
