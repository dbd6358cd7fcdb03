//! Default values referenced by the `Default` impls in `config::mod`.

pub const DEFAULT_WEIGHT_VECTOR: f64 = 0.55;
pub const DEFAULT_WEIGHT_KEYWORD: f64 = 0.15;
pub const DEFAULT_WEIGHT_RECENCY: f64 = 0.15;
pub const DEFAULT_WEIGHT_IMPORTANCE: f64 = 0.15;
pub const DEFAULT_RECENCY_HALF_LIFE_DAYS: f64 = 30.0;

pub const DEFAULT_TEMPORARY_TTL_DAYS: f64 = 14.0;
pub const DEFAULT_DEDUP_THRESHOLD: f64 = 0.93;
pub const DEFAULT_CLUSTER_MIN_SIZE: usize = 2;
pub const DEFAULT_CLUSTER_NEIGHBOR_LIMIT: usize = 8;

pub fn default_db_path() -> String {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    format!("{home}/.agenr/agenr.db")
}
