pub mod apps;
pub mod storage;
pub mod uninstall;
