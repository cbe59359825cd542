//! Deconfliction CLI - command line front end for the detector.
//!
//! The `deconflict` binary runs built-in demo scenarios or checks a JSON
//! scenario file, printing the verdict and optionally a plot description.

pub mod output;
pub mod scenarios;

pub use scenarios::{
    create_converging_scenario, create_head_on_scenario, create_reference_scenario,
};
