use rand::RngCore;

use ledger_app::AppState;

pub const TOKEN_HEADER: &str = "x-ledger-token";

#[derive(Clone)]
pub struct HttpState {
    pub app_state: AppState,
    pub token: String,
}

impl HttpState {
    pub fn new(app_state: AppState, token: String) -> Self {
        Self { app_state, token }
    }
}

pub fn generate_token() -> String {
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|byte| format!("{:02x}", byte)).collect()
}
