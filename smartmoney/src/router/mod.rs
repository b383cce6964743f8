pub mod candles;
pub(crate) mod util;
