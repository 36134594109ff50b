//! SlideSmith core library (session, transcript reducer, images, export).

pub mod config;
pub mod export;
pub mod images;
pub mod session;
pub mod theme;
pub mod transcript;
