pub mod evaluator;
pub mod report;
pub mod report_writer;
pub mod sampler;

pub use evaluator::EvaluatorService;
pub use report::ReportService;
pub use report_writer::ReportWriter;
pub use sampler::sample_questions;
