pub type Endpoint = str;

pub const READING: &Endpoint = "https://api.corrently.io/v2.0/iometer/reading";

/// Query parameter carrying the JWT.
pub const TOKEN_PARAM: &str = "token";
