use crate::domain::{GenerationProvider, SystemInstruction};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    // We use Arc<dyn Trait> to hold any implementation (dependency injection).
    pub provider: Arc<dyn GenerationProvider>,
    // Attached to every upstream request when set.
    pub system_instruction: Option<SystemInstruction>,
    // Public asset directory served for every non-API path.
    pub static_dir: PathBuf,
}
