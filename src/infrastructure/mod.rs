//! Infrastructure layer - Storage backends, services and logging

pub mod category;
pub mod logging;
pub mod movie;
pub mod storage;
