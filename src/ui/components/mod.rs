pub mod condition_checklist;
pub mod kpi_card;
pub mod listing_card;
pub mod price_summary;
pub mod score_badge;
pub mod stepper;
pub mod toast;
