pub mod build;
pub mod init;
pub mod og;
pub mod serve;
