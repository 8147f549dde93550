//! `jetimages` provides tools for the analysis of calorimeter images
//! and jets in NanoAOD-style ROOT files.
//!
//! # How to use
//!
//! The binaries `jetimages-plot`, `jetimages-accumulate`,
//! `jetimages-ratio`, `jetimages-npfcands`, `jetimages-selection-test`
//! and `jetimages-ptcheck` cover the common tasks. As a library, the
//! typical flow is
//!
//! 1. open a [reader::RootSource] and read [event::Event] records with
//!    an [reader::EventLoader], applying a [selection::VbfSelection],
//! 2. split jets with a [matching::Matcher],
//! 3. turn pixels into an [image::Image] and draw it with [plot].
//!
//! ## Most relevant modules
//!
//! - [reader] reads events from ROOT files
//! - [event] for the per-event record
//! - [matching] for matching jets to generator-level jets
//! - [selection] for the VBF selection
//! - [image] and [accumulate] for event images
//! - [plot] for figures
//!

/// Averages of event images
pub mod accumulate;
/// Variable-length event columns
pub mod columns;
/// Run configuration
pub mod config;
/// Naming of datasets
pub mod dataset;
/// Observables of the two leading jets
pub mod dijet;
/// Angular distances
pub mod distance;
/// Event record
pub mod event;
/// One-dimensional histograms
pub mod histogram;
/// Pseudorapidity-azimuth images
pub mod image;
/// Jets and particle-flow candidates
pub mod jet;
/// Per-event image plots
pub mod job;
/// Jet matching
pub mod matching;
/// Output directories
pub mod output;
/// Figures
pub mod plot;
/// Progress bar
pub mod progress_bar;
/// Input file hashes
pub mod provenance;
/// Comparison of jet pt with particle-flow candidates
pub mod ptcheck;
/// Event readers
pub mod reader;
/// Event selection
pub mod selection;
/// Common traits
pub mod traits;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_REV: Option<&str> = option_env!("VERGEN_GIT_SHA");
pub const GIT_BRANCH: Option<&str> = option_env!("VERGEN_GIT_BRANCH");
