//! Mail capability consumed by the account workflows

mod traits;

pub use traits::MailServiceTrait;
