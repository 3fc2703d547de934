pub mod borrow;
pub mod donation;
pub mod member;

pub use borrow::BorrowCommands;
pub use donation::DonationCommands;
pub use member::MemberCommands;
