pub mod analysis_panel;
pub mod call_list;
pub mod document_overlay;
pub mod header;
pub mod help_overlay;
pub mod price_chart;
pub mod transport_panel;
