pub mod checkout;
pub mod init;
pub mod log;
pub mod show_ref;
pub mod tag;
