use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Construction was handed geometry that cannot form a valid object:
    /// a zero vector, coincident or collinear points, a non-convex or
    /// non-coplanar vertex loop, a non-orthogonal camera basis or a
    /// non-positive radius or view-plane dimension.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
    /// Render was invoked before a required field was configured.
    #[error("missing resource: {0}")]
    MissingResource(&'static str),
    /// A worker thread died mid-render, so the sink holds an incomplete
    /// image.
    #[error("a render worker panicked, output is incomplete")]
    WorkerPanicked,
    #[error("image write failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
