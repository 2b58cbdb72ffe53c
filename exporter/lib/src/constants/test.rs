//! Test constants for use across all exporter tests
//!
//! Canned provider payloads shared by the mock connection and the unit tests,
//! so every test reasons about the same numbers.

/// Credentials used by tests and the mock mode
pub mod credentials {
    pub const ACCESS_KEY: &str = "test-access-key";
    pub const SECRET_KEY: &str = "test-secret-key";
}

/// Domains returned by the mocked domain listing
pub mod domains {
    pub const FIRST: &str = "cdn.example.com";
    pub const SECOND: &str = "static.example.com";

    pub fn listing() -> serde_json::Value {
        serde_json::json!({
            "domains": [
                {
                    "name": FIRST,
                    "type": "normal",
                    "cname": "cdn-example-com-idvc8hl.qiniudns.com",
                    "geo_cover": "china",
                    "platform": "web",
                    "protocol": "https"
                },
                {
                    "name": SECOND,
                    "type": "normal",
                    "cname": "static-example-com-idvc8hl.qiniudns.com",
                    "geo_cover": "global",
                    "platform": "dynamic",
                    "protocol": "http"
                }
            ]
        })
    }
}

/// Bandwidth samples, the china series averages to 2 MiB/s
pub mod bandwidth {
    pub const CHINA: [i64; 3] = [1_048_576, 2_097_152, 3_145_728];
    pub const OVERSEA: [i64; 3] = [10, 20, 30];

    /// Expected exposed value in Mbps
    pub const EXPOSED_MBPS: f64 = 2.0;

    pub fn response() -> serde_json::Value {
        serde_json::json!({
            "code": 200,
            "error": "",
            "data": {
                (super::domains::FIRST): { "china": CHINA, "oversea": OVERSEA }
            }
        })
    }
}

/// Hit/miss samples: 30 hits out of 40 requests, 3/4 of the bytes from cache
pub mod hit_miss {
    pub const HIT: [i64; 2] = [10, 20];
    pub const MISS: [i64; 2] = [5, 5];
    pub const TRAFFIC_HIT: [i64; 2] = [300, 600];
    pub const TRAFFIC_MISS: [i64; 2] = [100, 200];

    /// Expected exposed hit rate in percent
    pub const EXPOSED_HIT_RATE: f64 = 75.0;

    /// Expected exposed byte hit rate in percent
    pub const EXPOSED_FLUX_HIT_RATE: f64 = 75.0;

    pub fn response() -> serde_json::Value {
        serde_json::json!({
            "code": 200,
            "error": "",
            "data": {
                "hit": HIT,
                "miss": MISS,
                "trafficHit": TRAFFIC_HIT,
                "trafficMiss": TRAFFIC_MISS
            }
        })
    }
}

/// Status code samples: 200 x10, 404 x5 and a provider class bucket that must
/// be ignored
pub mod status_code {
    pub fn response() -> serde_json::Value {
        serde_json::json!({
            "code": 200,
            "error": "",
            "data": {
                "codes": {
                    "200": [4, 6],
                    "404": [2, 3],
                    "2xx": [0, 0]
                }
            }
        })
    }
}
