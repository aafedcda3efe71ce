pub mod axis;
pub mod series;

pub use series::{AlignedSeries, ChartRow, SeriesBuilder, SeriesLine};
