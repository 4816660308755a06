mod player_mount_steps;
mod progress_tracking_steps;
mod runtime_loading_steps;
