//! Native GUI for autopkgtest-runner.
//!
//! A single eframe/egui window over [`crate::controller::RunController`].

pub mod app;
pub mod modal;
pub mod theme;
