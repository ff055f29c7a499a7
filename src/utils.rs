use byte_unit::{AdjustedByte, Byte, UnitType};
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

pub fn display_bytes(size: u64) -> AdjustedByte {
    Byte::from(size).get_appropriate_unit(UnitType::Binary)
}

const PBAR_TEMPLATE: &str =
    "{span_child_prefix} {msg} {percent}% {wide_bar} {binary_bytes_per_sec} [{binary_bytes}/{binary_total_bytes}]";

pub fn setup_span_bar(span: &Span, size: u64, message: &'static str) {
    span.pb_set_message(message);
    if let Ok(style) = indicatif::ProgressStyle::default_bar().template(PBAR_TEMPLATE) {
        span.pb_set_style(&style);
    }
    span.pb_set_length(size);
}
