pub mod index;
pub mod init;
pub mod root;
pub mod strip;
