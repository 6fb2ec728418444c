pub mod anchors;
pub mod baseline;
pub mod estimator;
pub mod form;
pub mod goals;
pub mod input_parser;
pub mod intensity;
pub mod output_formatter;
pub mod plates;
pub mod progressive_overload;
