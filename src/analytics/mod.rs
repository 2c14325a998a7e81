// Analytics module for time-bucketed histograms
// Author: Gabriel Demetrios Lafis

mod aggregate;
mod bucket;
mod filter;
mod interval;

pub use aggregate::*;
pub use bucket::*;
pub use filter::*;
pub use interval::*;
