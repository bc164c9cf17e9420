//! Plotter firmware protocols

pub mod graphtec;
