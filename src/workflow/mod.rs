pub mod experiment_flow;

pub use experiment_flow::{save_results_at, save_results_to_file, ExperimentFlow};
