use poem_openapi::auth::ApiKey;
use poem_openapi::SecurityScheme;

pub const TOKEN_HEADER: &str = "X-Transferdeck-Token";

#[derive(SecurityScheme)]
#[oai(ty = "api_key", key_name = "X-Transferdeck-Token", key_in = "header")]
pub struct TokenSecurityScheme(pub ApiKey);
