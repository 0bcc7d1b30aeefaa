pub mod artifact;
pub mod asset;
pub mod catalog;
pub mod config;
pub mod error;
pub mod facade;
pub mod plugin;
pub mod prelude;
pub mod reflect;
pub mod render;
pub mod source;
pub mod systems;
