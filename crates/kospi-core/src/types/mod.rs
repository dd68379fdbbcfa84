//! 핵심 도메인 타입.

pub mod bar;
pub mod company;
pub mod period;
pub mod tracked;

pub use bar::DailyBar;
pub use company::Company;
pub use period::Period;
pub use tracked::{fallback_name, kospi_top10, TrackedSymbol};
