//! Core library for the workday-markdown command line application.
//!
//! The library turns peer feedback exports (XLSX workbooks) into a single
//! Markdown report grouped by recipient. Responsibilities are kept narrow:
//! workbook and report IO lives under [`workday::markdown::io`], the typed
//! rows and feedback records inside [`workday::markdown::model`], layout
//! detection in [`workday::markdown::normalize`], cutoff filtering and
//! grouping in [`workday::markdown::aggregate`], and the run orchestration
//! under [`workday::markdown::convert`].

pub mod workday;

pub use workday::markdown::{
    ConvertError, Result, RowError, aggregate, convert, error, io, model, normalize,
};
