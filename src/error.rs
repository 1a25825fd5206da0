use thiserror::Error;

/// Top-level error type for the geometry pipeline.
#[derive(Debug, Error)]
pub enum GeolabError {
    /// A caller-supplied value is out of its valid domain (non-positive
    /// width or radius, wrongly sized point list, non-finite coordinate).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The receiver cannot answer the query in its current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Triangulation(#[from] TriangulationError),
}

/// Errors raised while triangulating a simple polygon.
#[derive(Debug, Error, PartialEq)]
pub enum TriangulationError {
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("vertex {0} has a non-finite coordinate")]
    NonFinite(usize),

    #[error("vertices {first} and {second} coincide")]
    DuplicateVertex { first: usize, second: usize },

    #[error("polygon has zero area")]
    ZeroArea,

    #[error("polygon is wound clockwise, expected counter-clockwise")]
    WrongWinding,

    #[error("edges {first} and {second} intersect")]
    SelfIntersecting { first: usize, second: usize },

    #[error("no ear found with {remaining} vertices remaining")]
    NoEarFound { remaining: usize },

    #[error("constrained delaunay triangulation failed: {0}")]
    Delaunay(String),
}

/// Convenience type alias for results using [`GeolabError`].
pub type Result<T> = std::result::Result<T, GeolabError>;
