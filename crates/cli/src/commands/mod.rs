pub mod demo;
pub mod show;
