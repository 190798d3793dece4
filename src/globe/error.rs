use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlobeError {
    #[error("Sphere radius must be positive, got {0}")]
    InvalidRadius(f32),
    #[error("Dot polygon needs a positive radius and at least 3 sides, got radius {radius} and {sides} sides")]
    InvalidDotShape { radius: f32, sides: u32 },
    #[error("Land mask of {width}x{height} needs {expected} RGBA bytes, got {actual}")]
    InvalidMask {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("Unable to decode land mask image")]
    MaskDecode(#[from] image::ImageError),
    #[error("Unable to read settings")]
    Settings(#[from] config::ConfigError),
}
