//! Command implementations.

pub mod decide;
pub mod history;
pub mod list;
pub mod seed;

pub use self::decide::execute_decide;
pub use self::history::execute_history;
pub use self::list::{execute_patterns, execute_rules};
pub use self::seed::execute_seed;
