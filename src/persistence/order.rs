//! The sequence check behind [`super::Store::check_order`].
//!
//! A table is expected to hold keys `1, 2, 3, ...` without holes. Key `0`
//! sits outside that contract and is skipped.

pub fn next_in_sequence(keys: &[u64]) -> Result<u64, u64> {
    //! Walk ascending `keys` and compare each against its expected position.
    //!
    //! Returns `Ok(next)` with the smallest key not yet present when the run
    //! is unbroken, or `Err(expected)` with the first key that should exist
    //! but does not.

    let start = keys.iter().take_while(|&&key| key < 1).count();
    let run = &keys[start..];

    for (index, &key) in run.iter().enumerate() {
        let expected = index as u64 + 1;
        if key != expected {
            return Err(expected);
        }
    }

    Ok(run.len() as u64 + 1)
}
