use rand::{rngs::OsRng, Rng};

/// Lifetime of an issued code, in seconds.
pub const OTP_TTL_SECS: i64 = 120;

pub const OTP_LENGTH: usize = 5;

/// Uniform over `00000..=99999`, zero-padded.
pub fn generate_code() -> String {
    let code: u32 = OsRng.gen_range(0..100_000);
    format!("{:0width$}", code, width = OTP_LENGTH)
}

/// Compares without short-circuiting on the first differing byte.
pub fn codes_match(expected: &str, submitted: &str) -> bool {
    let (expected, submitted) = (expected.as_bytes(), submitted.as_bytes());
    if expected.len() != submitted.len() {
        return false;
    }

    expected
        .iter()
        .zip(submitted)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
