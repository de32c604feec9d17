//! Client-generated identifier pieces

use jiff::Timestamp;
use rand::{Rng, seq::SliceRandom};

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random tail appended to generated identifiers.
pub(crate) const SUFFIX_LEN: usize = 9;

/// Build `{prefix}_{epoch millis}_{9 base36 chars}`.
pub(crate) fn timestamped_id<R: Rng + ?Sized>(prefix: &str, now: Timestamp, rng: &mut R) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .filter_map(|_| BASE36.choose(rng))
        .map(|byte| char::from(*byte))
        .collect();

    format!("{prefix}_{}_{suffix}", now.as_millisecond())
}

/// Check that `value` has the `{prefix}_{digits}_{base36}` shape.
pub(crate) fn is_timestamped_id(prefix: &str, value: &str) -> bool {
    let Some(rest) = value
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('_'))
    else {
        return false;
    };

    let Some((millis, suffix)) = rest.split_once('_') else {
        return false;
    };

    !millis.is_empty()
        && millis.bytes().all(|byte| byte.is_ascii_digit())
        && !suffix.is_empty()
        && suffix.bytes().all(|byte| BASE36.contains(&byte))
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn timestamped_id_has_expected_shape() -> TestResult {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Timestamp::from_millisecond(1_736_762_400_000)?;

        let id = timestamped_id("BMP", now, &mut rng);

        assert!(id.starts_with("BMP_1736762400000_"), "unexpected id {id}");
        assert_eq!(id.len(), "BMP_1736762400000_".len() + SUFFIX_LEN);
        assert!(is_timestamped_id("BMP", &id));

        Ok(())
    }

    #[test]
    fn is_timestamped_id_rejects_other_shapes() {
        assert!(!is_timestamped_id("BMP", "session_1_abc"));
        assert!(!is_timestamped_id("BMP", "BMP_abc_def"));
        assert!(!is_timestamped_id("BMP", "BMP_123_"));
        assert!(!is_timestamped_id("BMP", "BMP_123_ABC"));
        assert!(!is_timestamped_id("BMP", "BMP123_abc"));
    }
}
