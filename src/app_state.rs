use std::sync::Arc;

use crate::store::FollowStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FollowStore>,
}

impl AppState {
    pub fn new<S>(store: S) -> Self
    where
        S: FollowStore + 'static,
    {
        Self {
            store: Arc::new(store),
        }
    }
}
