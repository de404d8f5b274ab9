use mystops::prelude::*;

pub struct AppState {
    pub client: TriMetClient,
    pub config: Config,
}

impl AppState {
    pub fn new(client: TriMetClient, config: Config) -> Self {
        Self { client, config }
    }
}
