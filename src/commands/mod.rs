pub mod browse;
pub mod init;
