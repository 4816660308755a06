mod use_embed;
mod use_player_mount;

pub use use_embed::{use_embed, use_progress, use_runtime_loader, EmbedContext, Progress};
pub use use_player_mount::{use_player_mount, WebPlayerMount};
