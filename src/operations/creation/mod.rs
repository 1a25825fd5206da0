mod make_circle;

pub use make_circle::MakeCircle;
