pub mod reports;
pub mod session;
pub mod tester;

pub use session::{BrowsingSession, LoadPolicy, SessionSummary, TesterAssets};
pub use tester::*;
