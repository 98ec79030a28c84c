pub mod analysis_view;
pub mod camera_view;
pub mod header;
pub mod home;
pub mod preview;
pub mod settings_panel;
pub mod time_travel_view;
pub mod toast;
