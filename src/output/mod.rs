pub mod formatter;

pub use formatter::{
    format_projection_table, format_results_table, format_tournament_list, format_totals_table,
    format_totals_tsv, should_use_colors,
};
