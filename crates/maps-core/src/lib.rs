pub mod config;
pub mod consts;
pub mod cutoff;
pub mod error;
pub mod frame;
pub mod io;
pub mod pearson;
pub mod progress;
pub mod ptc;
pub mod run;
pub mod session;
pub mod stats;
