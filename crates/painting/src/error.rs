use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Surface extent {width}x{height} exceeds raster limits (max dimension {max_dimension}, max area {max_area})")]
    ExtentTooLarge {
        width: u32,
        height: u32,
        max_dimension: u32,
        max_area: u64,
    },
}
