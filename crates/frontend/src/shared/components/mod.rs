pub mod chart_view;
pub mod data_table;
pub mod filter_panel;
pub mod multi_select;
pub mod number_format;
