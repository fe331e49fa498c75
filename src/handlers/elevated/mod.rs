// handlers/elevated/mod.rs - manager role required
//
// Role comes from the store record resolved by `authenticate`, never from the token.
pub mod advisors;
pub mod qr;

pub use advisors::advisor_list;
pub use qr::qr_refresh_post;
