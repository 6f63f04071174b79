pub mod analysis_card;
pub mod ecg_viewer;
pub mod header;
pub mod history_list;
pub mod notice_stack;
pub mod upload_area;
