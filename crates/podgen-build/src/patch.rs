//! Result patches
//!
//! A patch rewrites the analyzer results of one platform after analysis and
//! before any target is built. Patches run in the order they are given.

use crate::analyzer::AnalyzerResults;

pub trait Patch: Send + Sync {
    fn apply(&self, results: &mut AnalyzerResults);
}

impl<F> Patch for F
where
    F: Fn(&mut AnalyzerResults) + Send + Sync,
{
    fn apply(&self, results: &mut AnalyzerResults) {
        self(results)
    }
}
