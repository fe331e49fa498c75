// handlers/protected/mod.rs - bearer token required
//
// Routes here sit behind `authenticate`; advisor-scoped routes also pass
// through `require_self_or_manager` before reaching a handler.
pub mod advisors;
pub mod whoami;

pub use advisors::{advisor_get, performance_get};
pub use whoami::whoami_get;
