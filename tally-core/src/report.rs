//! Plain-text rendering of the aggregate table for the log side-channel.

use crate::model::AggregateState;
use std::fmt::Write;

/// Header row of [`render_table`].
pub const TABLE_HEADER: &str = "ID\tResultadoSoma\tResultadoSubtracao";

/// Render states as a tab-separated table, one row per key, values with six
/// fractional digits.
pub fn render_table(states: &[AggregateState]) -> String {
    let mut out = String::with_capacity(TABLE_HEADER.len() + 1 + states.len() * 32);
    out.push_str(TABLE_HEADER);
    for state in states {
        // Writing into a String cannot fail.
        let _ = write!(
            out,
            "\n{}\t{:.6}\t{:.6}",
            state.key, state.sum_result, state.diff_result
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_is_header_only() {
        assert_eq!(render_table(&[]), TABLE_HEADER);
    }

    #[test]
    fn test_rows() {
        let states = [
            AggregateState {
                key: "a".into(),
                sum_result: 7.0,
                diff_result: 2.0,
            },
            AggregateState {
                key: "b".into(),
                sum_result: -0.5,
                diff_result: f64::NAN,
            },
        ];
        assert_eq!(
            render_table(&states),
            "ID\tResultadoSoma\tResultadoSubtracao\n\
             a\t7.000000\t2.000000\n\
             b\t-0.500000\tNaN"
        );
    }
}
