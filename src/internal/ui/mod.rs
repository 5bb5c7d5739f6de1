pub mod runner;
pub mod surface;
pub mod view;
