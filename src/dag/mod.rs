// src/dag/mod.rs

//! Task graph: which pipelines an invocable task name stands for.

pub mod graph;

pub use graph::TaskGraph;
