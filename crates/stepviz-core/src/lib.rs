//! Stepviz Core Types and Definitions
//!
//! This crate provides the foundational types shared by the stepviz
//! workspace. It includes:
//!
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Points, sizes, bounds and insets ([`geometry`] module)
//! - **Intersection**: Boundary clipping math for node outlines ([`intersect`] module)
//! - **Draw**: Text, strokes, layered output and arrows ([`draw`] module)
//! - **Semantic**: Workflow definitions, execution status and timeline records ([`semantic`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod intersect;
pub mod semantic;
