pub mod reconciler;
pub mod types;

pub use reconciler::{QuoteReconciler, classify_failure, precheck};
pub use types::{CodeProbe, PairProbe, PriceResult};
