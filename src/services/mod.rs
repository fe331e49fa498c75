pub mod feedback_service;
pub mod qr_service;

pub use feedback_service::{FeedbackError, FeedbackForm, FeedbackFormInfo, FeedbackReceipt, FeedbackService, RawRating};
pub use qr_service::{QrRefreshReport, QrService};
