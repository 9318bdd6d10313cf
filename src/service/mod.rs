pub mod feedback;
pub mod qr;

pub use feedback::{FeedbackService, StatsSummary};
