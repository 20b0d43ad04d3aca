// Subslate - subtitle image compositing library

pub mod canvas;
pub mod config;
pub mod constants;
pub mod encoder;
pub mod error;
pub mod generator;
pub mod layout;
pub mod logging;
pub mod position;
pub mod session;
pub mod subtitle;
pub mod text;
pub mod watermark;
