pub mod audit;
pub mod borrow;
pub mod dispatch;
pub mod donation;
pub mod member;
pub mod shared;
