use rand::Rng;

pub const RANDOM_SUFFIX_LEN: usize = 10;
pub const MAX_BUCKET_NAME_LEN: usize = 63;

/// Fixed-length string of lowercase ASCII letters.
pub fn random_suffix(rng: &mut impl Rng, len: usize) -> String {
    (0..len).map(|_| rng.gen_range('a'..='z')).collect()
}

/// Bucket name for a resource whose template did not set `BucketName`:
/// the lowercased logical id followed by a random lowercase suffix. The
/// prefix is shortened when the result would exceed the S3 name limit.
pub fn synthesize_bucket_name(logical_resource_id: &str, rng: &mut impl Rng) -> String {
    let prefix: String = logical_resource_id
        .to_lowercase()
        .chars()
        .take(MAX_BUCKET_NAME_LEN - RANDOM_SUFFIX_LEN)
        .collect();
    format!("{prefix}{}", random_suffix(rng, RANDOM_SUFFIX_LEN))
}

pub fn resolve_bucket_name(
    explicit_name: Option<&str>,
    logical_resource_id: &str,
    rng: &mut impl Rng,
) -> String {
    match explicit_name {
        Some(name) => name.to_string(),
        None => synthesize_bucket_name(logical_resource_id, rng),
    }
}
