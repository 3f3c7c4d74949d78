//! Recursive Whitted-style ray tracer.
//!
//! A [`Scene`] collects surfaces and lights, a [`Camera`] maps pixels to
//! view-plane points, a [`WhittedTracer`] shades individual rays and a
//! [`Renderer`] drives the whole image across worker threads into a
//! [`sink::PixelSink`].

pub mod camera;
pub mod color;
pub mod consts;
pub mod error;
pub mod float;
pub mod geometry;
pub mod intersect;
pub mod light;
pub mod material;
pub mod renderer;
pub mod sampler;
pub mod scene;
pub mod sink;
pub mod stats;
pub mod tracer;

pub use crate::camera::Camera;
pub use crate::color::Color;
pub use crate::error::{Error, Result};
pub use crate::float::Float;
pub use crate::intersect::Ray;
pub use crate::renderer::{RenderConfig, Renderer};
pub use crate::sampler::Sampling;
pub use crate::scene::Scene;
pub use crate::tracer::WhittedTracer;
