pub mod polygon;
pub mod polyline;
pub mod spline;

pub use polygon::Polygon;
pub use polyline::Polyline;
pub use spline::Spline;
