//! UI components for H5P embedding

mod activity_list;
mod h5p_player;
mod progress_panel;

pub use activity_list::{ActivityList, ActivityListProps};
pub use h5p_player::{H5PPlayer, H5PPlayerProps};
pub use progress_panel::{format_percent, ProgressPanel, ProgressPanelProps};
