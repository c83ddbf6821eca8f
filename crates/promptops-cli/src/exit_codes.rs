//! Process exit codes. Part of the CLI contract.

pub const SUCCESS: i32 = 0;
/// At least one case failed its pass condition.
pub const TEST_FAILED: i32 = 1;
/// Invalid configuration, missing credentials or another fatal setup error.
pub const CONFIG_ERROR: i32 = 2;
/// No failures, but at least one case errored (provider failure, timeout).
pub const CASE_ERROR: i32 = 3;

pub fn for_counts(failed: usize, errored: usize) -> i32 {
    if failed > 0 {
        TEST_FAILED
    } else if errored > 0 {
        CASE_ERROR
    } else {
        SUCCESS
    }
}
