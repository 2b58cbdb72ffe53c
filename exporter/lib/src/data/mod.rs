//! Data access for the Qiniu CDN exporter

pub mod qiniu;
