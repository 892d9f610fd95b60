pub mod npy;
pub mod raw;
pub mod run_dir;
