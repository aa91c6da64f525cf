pub mod candle;
pub mod timeframe;

pub use candle::{Candle, PriceSeries, SeriesSummary};
pub use timeframe::{Granularity, TimeframeResolution, TimeframeSelector};
