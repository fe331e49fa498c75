// handlers/public/mod.rs - endpoints reachable without a token
//
// Customers arrive here from a scanned QR code; advisors trade credentials for a token.
pub mod feedback;
pub mod login;
pub mod system;

pub use feedback::{form_get, legacy_submit_post, submit_post, FeedbackPayload};
pub use login::login_post;
pub use system::{health, root};
