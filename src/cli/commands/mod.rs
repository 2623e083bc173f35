pub mod convert;
pub mod init;
