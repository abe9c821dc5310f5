//! Core library for the iberic-map-tools command line application.
//!
//! The library turns the pricing workbook and the Iberian SVG map into the
//! JSON artifacts the map front end loads. IO adapters live under
//! [`iberic::tools::io`], data representations inside
//! [`iberic::tools::model`], the zone matching in
//! [`iberic::tools::reconcile`], the product matrix extraction in
//! [`iberic::tools::products`], and the end-to-end pipelines under
//! [`iberic::tools::generate`].

pub mod iberic;

pub use iberic::tools::{Result, ToolError, error, generate, io, model, products, reconcile};
