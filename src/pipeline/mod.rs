// Pipeline orchestration — the stage-sequential batch run.

pub mod run;

pub use run::{run, RunParams, RunSummary};
